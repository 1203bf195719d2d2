//! ATS scoring — deterministic 0-100 completeness rubric over the resume
//! document. No LLM call: the score must be stable for the same input.
//!
//! Rubric: personal info 20 (5 per field), summary 15, experience 30
//! (15 presence + 15 detailed descriptions), education 15, skills 10,
//! projects 10. Capped at 100.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct AtsReport {
    pub score: u32,
    pub feedback: Vec<String>,
}

pub fn score_resume(data: &Value) -> AtsReport {
    let mut score: u32 = 0;
    let mut feedback: Vec<String> = Vec::new();

    let personal = &data["personal_info"];
    let personal_fields = [
        ("full_name", "Add your full name"),
        ("email", "Add your email address"),
        ("phone", "Add your phone number"),
        ("location", "Add your location"),
    ];
    for (key, hint) in personal_fields {
        if non_empty_str(&personal[key]) {
            score += 5;
        } else {
            feedback.push(hint.to_string());
        }
    }

    // Professional summary: meaningful only past 100 characters.
    match data["professional_summary"].as_str() {
        Some(s) if s.len() > 100 => score += 15,
        _ => feedback.push("Add a professional summary (100+ characters)".to_string()),
    }

    match data["experience"].as_array() {
        Some(entries) if !entries.is_empty() => {
            score += 15;
            let has_descriptions = entries.iter().any(|exp| {
                exp["description"]
                    .as_str()
                    .is_some_and(|d| d.len() > 50)
            });
            if has_descriptions {
                score += 15;
            } else {
                feedback.push("Add detailed descriptions to your work experience".to_string());
            }
        }
        _ => feedback.push("Add at least one work experience".to_string()),
    }

    match data["education"].as_array() {
        Some(entries) if !entries.is_empty() => score += 15,
        _ => feedback.push("Add your education details".to_string()),
    }

    match data["skills"].as_array() {
        Some(skills) if skills.len() >= 5 => score += 10,
        _ => feedback.push("Add at least 5 skills".to_string()),
    }

    match data["project"].as_array() {
        Some(projects) if !projects.is_empty() => score += 10,
        _ => feedback.push("Add at least one project".to_string()),
    }

    AtsReport {
        score: score.min(100),
        feedback,
    }
}

fn non_empty_str(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_resume() -> Value {
        json!({
            "personal_info": {
                "full_name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+1 555 0100",
                "location": "London"
            },
            "professional_summary": "Analytical engine programmer with a decade of experience designing computational systems and translating mathematical theory into working machinery.",
            "experience": [{
                "company": "Analytical Engines Ltd",
                "position": "Programmer",
                "description": "Designed and documented the first published algorithm intended for execution on a machine."
            }],
            "education": [{"institution": "Home tutoring", "degree": "Mathematics"}],
            "skills": ["math", "logic", "writing", "analysis", "programming"],
            "project": [{"name": "Note G", "description": "Bernoulli number algorithm"}]
        })
    }

    #[test]
    fn test_complete_resume_scores_100() {
        let report = score_resume(&complete_resume());
        assert_eq!(report.score, 100);
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn test_empty_resume_scores_zero_with_feedback() {
        let report = score_resume(&json!({}));
        assert_eq!(report.score, 0);
        assert!(report.feedback.contains(&"Add your full name".to_string()));
        assert!(report
            .feedback
            .contains(&"Add at least one work experience".to_string()));
    }

    #[test]
    fn test_short_summary_not_counted() {
        let mut resume = complete_resume();
        resume["professional_summary"] = json!("Too short");
        let report = score_resume(&resume);
        assert_eq!(report.score, 85);
        assert!(report
            .feedback
            .contains(&"Add a professional summary (100+ characters)".to_string()));
    }

    #[test]
    fn test_experience_without_descriptions_half_credit() {
        let mut resume = complete_resume();
        resume["experience"] = json!([{"company": "X", "position": "Y", "description": "short"}]);
        let report = score_resume(&resume);
        assert_eq!(report.score, 85);
    }

    #[test]
    fn test_fewer_than_five_skills_not_counted() {
        let mut resume = complete_resume();
        resume["skills"] = json!(["one", "two"]);
        let report = score_resume(&resume);
        assert_eq!(report.score, 90);
        assert!(report.feedback.contains(&"Add at least 5 skills".to_string()));
    }

    #[test]
    fn test_deterministic() {
        let resume = complete_resume();
        let a = score_resume(&resume);
        let b = score_resume(&resume);
        assert_eq!(a.score, b.score);
        assert_eq!(a.feedback, b.feedback);
    }
}
