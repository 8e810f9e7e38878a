// Resume structuring prompt. The JSON shape mirrors the keys read by record::normalize.

pub const RESUME_EXTRACTION_PROMPT: &str = r#"You process resumes (CVs). Extract structured data from the raw, unstructured resume text below.

Rules:
- Return only valid JSON in exactly the shape shown. No text outside the JSON.
- Fill any missing scalar with "--" and any missing list with [].
- Treat synonymous section titles as equivalent ("Education" = "Studies", "Institution" = "University", and so on).
- "Marital Status" is one of "Single", "Married", "Divorced", "Widowed" or "--".
- "Compensation Type" is one of "Gross", "Net", "Hybrid" or "--".
- "Languages" lists language names in English, for example ["English", "Spanish"].

Output format:
{
  "Personal Information": {
    "Full Name": "--",
    "Email": "--",
    "Phone": "--",
    "Location": "--",
    "Age": "--",
    "Marital Status": "--"
  },
  "Education": [
    {
      "Degree": "--",
      "Field": "--",
      "Institution": "--",
      "Graduation Year": "--"
    }
  ],
  "Languages": [],
  "Professional Experience": [
    {
      "Company": "--",
      "Total Years in Company": "--",
      "Position": "--",
      "Years in Position": "--",
      "Achievements and Responsibilities": "--",
      "Internal Rotation": "--"
    }
  ],
  "Other Achievements": [
    {
      "Type": "--",
      "Title": "--",
      "Institution": "--",
      "Year": "--"
    }
  ],
  "Current Compensation": {
    "Gross Salary": "--",
    "Net Salary": "--",
    "Compensation Type": "--"
  }
}

Resume text:
"""
{cv_text}
"""
"#;

pub fn build_extraction_prompt(cv_text: &str) -> String {
    RESUME_EXTRACTION_PROMPT.replace("{cv_text}", cv_text)
}
