// Prompt constants for job-posting extraction.

/// Extraction prompt template. Replace `{source_ref}` and `{posting_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are an expert recruiter's assistant. Analyze the job posting text below and extract structured information.

Return a single JSON object with EXACTLY these keys:
{
  "job_title": "The title of the role",
  "company_name": "The hiring company",
  "job_description": "A concise summary (2-4 sentences) of the role and its responsibilities",
  "required_skills": ["Skill one", "Skill two"],
  "emails": ["contact@example.com"]
}

Rules:
- "required_skills" and "emails" MUST be JSON arrays of strings, empty if nothing is found.
- Only include emails that literally appear in the text.
- Use concise skill names (e.g. "Python", "Kubernetes", "Stakeholder management").
- If a value cannot be determined, omit the key.
- Respond with the JSON object only, optionally wrapped in a ```json code fence.

Source URL: {source_ref}

JOB POSTING TEXT:
{posting_text}"#;

pub fn build_extraction_prompt(posting_text: &str, source_ref: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{source_ref}", source_ref)
        .replace("{posting_text}", posting_text)
}
