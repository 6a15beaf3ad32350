use serde::{Deserialize, Deserializer, Serialize};

/// A user question plus whatever context came with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    pub uploaded_files: Vec<String>,
    pub urls: Vec<String>,
}

/// Step-1 model output: scraping code plus the libraries it needs and the
/// questions extracted from the user's request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapePlan {
    pub code: String,
    #[serde(default)]
    pub libraries: Vec<String>,
    // The hosted API has returned this both as a bare string and as a list.
    #[serde(default, deserialize_with = "string_or_list")]
    pub questions: Vec<String>,
}

/// Step-2 model output: analysis code plus its libraries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPlan {
    pub code: String,
    #[serde(default)]
    pub libraries: Vec<String>,
}

/// What the analysis prompt gets to see about the collected data.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSummary {
    /// Leading rows of `data.csv`, capped.
    CsvPreview(String),
    /// Contents of `metadata.txt`.
    Metadata(String),
    /// Neither file had content; just name what is in the workspace.
    FileListing(Vec<String>),
}

impl DatasetSummary {
    pub fn kind(&self) -> &'static str {
        match self {
            DatasetSummary::CsvPreview(_) => "csv preview",
            DatasetSummary::Metadata(_) => "metadata",
            DatasetSummary::FileListing(_) => "file listing",
        }
    }

    pub fn as_prompt_text(&self) -> String {
        match self {
            DatasetSummary::CsvPreview(preview) => {
                format!("First rows of data.csv:\n{}", preview)
            }
            DatasetSummary::Metadata(text) => {
                format!("Contents of metadata.txt:\n{}", text)
            }
            DatasetSummary::FileListing(files) if files.is_empty() => {
                "No dataset was produced yet and the workspace is empty.".to_string()
            }
            DatasetSummary::FileListing(files) => {
                format!(
                    "No dataset was produced yet. Files in the workspace: {}",
                    files.join(", ")
                )
            }
        }
    }
}

/// The JSON body returned to HTTP callers and printed by the one-shot CLI.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub workspace_id: String,
    pub folder: String,
    pub scrape: ScrapePlan,
    pub analysis: AnalysisPlan,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => vec![s],
        StringOrList::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_plan_with_question_list() {
        let json = r#"{"code": "print(1)", "libraries": ["pandas"], "questions": ["How many rows?"]}"#;
        let plan: ScrapePlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.code, "print(1)");
        assert_eq!(plan.libraries, vec!["pandas"]);
        assert_eq!(plan.questions, vec!["How many rows?"]);
    }

    #[test]
    fn test_scrape_plan_with_question_string() {
        let json = r#"{"code": "print(1)", "libraries": [], "questions": "How many rows?"}"#;
        let plan: ScrapePlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.questions, vec!["How many rows?"]);
    }

    #[test]
    fn test_scrape_plan_defaults_optional_fields() {
        let json = r#"{"code": "print(1)"}"#;
        let plan: ScrapePlan = serde_json::from_str(json).unwrap();

        assert!(plan.libraries.is_empty());
        assert!(plan.questions.is_empty());
    }

    #[test]
    fn test_analysis_plan_roundtrip() {
        let json = r#"{"code": "df.describe()", "libraries": ["pandas", "matplotlib"]}"#;
        let plan: AnalysisPlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.libraries.len(), 2);
    }

    #[test]
    fn test_dataset_summary_prompt_text() {
        let summary = DatasetSummary::CsvPreview("a,b\n1,2".to_string());
        assert!(summary.as_prompt_text().contains("data.csv"));

        let empty = DatasetSummary::FileListing(vec![]);
        assert!(empty.as_prompt_text().contains("empty"));

        let listing = DatasetSummary::FileListing(vec!["report.pdf".to_string()]);
        assert!(listing.as_prompt_text().contains("report.pdf"));
    }
}
