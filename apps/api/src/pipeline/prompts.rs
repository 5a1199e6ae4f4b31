// Prompt constants for the three resume collaborators.
// Templates use `{placeholder}` markers that are filled by `fill_template`.

pub const PARSE_ROLE: &str = "You are an expert resume parser. \
    Convert raw resume text into structured data without losing detail.";

/// Replace `{resume_text}` and `{fidelity}` before sending.
pub const PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured information from the resume text below.

Return a JSON object with this schema (omit fields that are not present):
{
  "name": "Jane Doe",
  "email": "jane@example.com",
  "phone": "+1 555 0100",
  "location": "Berlin, Germany",
  "links": ["https://github.com/janedoe"],
  "summary": "Backend engineer focused on data systems",
  "skills": ["Rust", "PostgreSQL", "Kubernetes"],
  "experience": [
    {
      "company": "Acme",
      "title": "Senior Engineer",
      "start_date": "2021-03",
      "end_date": "present",
      "highlights": ["Cut p99 latency by 40%"]
    }
  ],
  "education": [
    {"institution": "TU Berlin", "degree": "BSc Computer Science", "year": "2018"}
  ],
  "projects": [
    {"name": "tinydb", "description": "Embedded KV store", "technologies": ["Rust"], "url": null}
  ],
  "certifications": ["CKA"]
}

Rules:
- "skills" is a flat list of individual skill names, one technology or competency per entry.
- Use the "EXTRACTED URLS/LINKS" block, when present, to fill "links" and project URLs.
- {fidelity}

RESUME TEXT:
{resume_text}"#;

pub const SCREEN_ROLE: &str = "You are an experienced technical recruiter. \
    Score how well a candidate fits a specific job, fairly and consistently.";

/// Replace `{job_title}`, `{job_description}`, `{resume_json}` and `{weights}`.
pub const SCREEN_PROMPT_TEMPLATE: &str = r#"Evaluate the candidate below against the job.

JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_description}

CANDIDATE (structured resume JSON):
{resume_json}

CATEGORY WEIGHTS:
{weights}

Return a JSON object with this schema:
{
  "overall_score": 7.5,
  "skill_match": {"score": 8, "matched": ["sql"], "missing": ["kafka"], "notes": "..."},
  "experience_match": {"score": 7, "notes": "..."},
  "education_match": {"score": 6, "notes": "..."},
  "project_match": {"score": 8, "notes": "..."},
  "cultural_fit": {"score": 7, "notes": "..."},
  "strengths": ["..."],
  "weaknesses": ["..."],
  "recommendation": "interview"
}

Rules:
- "overall_score" is a number from 0 to 10 and reflects the category weights.
- Category scores are numbers from 0 to 10.
- The candidate's "skills" list is already normalized to canonical names; treat it as authoritative."#;

/// Used when the caller supplies no weights.
pub const DEFAULT_WEIGHTS_NOTE: &str = "No weights supplied; weigh all categories equally.";

pub const OPTIMIZE_ROLE: &str = "You are an expert career coach and technical recruiter. \
    Give actionable, specific and professional suggestions to improve a resume for one job. \
    Be constructive and concise.";

/// Replace `{job_title}`, `{job_description}`, `{resume_json}` and `{screening_json}`.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_description}

PARSED RESUME:
{resume_json}

SCREENING EVALUATION RESULT:
{screening_json}

Return a JSON object with this schema:
{
  "summary": "One paragraph on how the resume reads for this job",
  "missing_skills": ["Important skills the job asks for that the resume lacks"],
  "content_gaps": ["Missing or weak experience, projects or achievements"],
  "formatting_tips": ["Clarity and structure improvements"],
  "customization_tips": ["Ways to tailor the resume to this job"],
  "priority_actions": ["The three most important actions, most important first"]
}

"priority_actions" must contain at most three entries."#;

/// Fills `{key}` placeholders in a single pass over `template`. Substituted
/// values are never rescanned, so user text containing `{job_title}` and the
/// like is inserted verbatim. Unknown `{...}` sequences are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let placeholder = values.iter().find(|(key, _)| {
            tail[1..].starts_with(key) && tail[1 + key.len()..].starts_with('}')
        });
        match placeholder {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_keys() {
        let filled = fill_template(
            "{job_title}: {job_description}",
            &[("job_title", "Data Engineer"), ("job_description", "SQL")],
        );
        assert_eq!(filled, "Data Engineer: SQL");
    }

    #[test]
    fn test_fill_template_keeps_json_braces() {
        let filled = fill_template(r#"{"score": 7} for {name}"#, &[("name", "Jane")]);
        assert_eq!(filled, r#"{"score": 7} for Jane"#);
    }

    #[test]
    fn test_inserted_text_is_not_rescanned() {
        let filled = fill_template(
            "{resume_json} | {job_description} | {job_title}",
            &[
                ("resume_json", r#"{"summary": "wants {job_title} roles"}"#),
                ("job_description", "Report to the {job_title} lead"),
                ("job_title", "Data Engineer"),
            ],
        );
        assert_eq!(
            filled,
            r#"{"summary": "wants {job_title} roles"} | Report to the {job_title} lead | Data Engineer"#
        );
    }

    #[test]
    fn test_screen_template_fills_every_placeholder() {
        let filled = fill_template(
            SCREEN_PROMPT_TEMPLATE,
            &[
                ("job_title", "t"),
                ("job_description", "d"),
                ("resume_json", "{}"),
                ("weights", DEFAULT_WEIGHTS_NOTE),
            ],
        );
        for key in ["{job_title}", "{job_description}", "{resume_json}", "{weights}"] {
            assert!(!filled.contains(key), "{key} left unfilled");
        }
    }
}
