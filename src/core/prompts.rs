use crate::domain::model::{DatasetSummary, QuestionRequest};

/// Upper bound on how much of `data.csv` is ever embedded in a prompt.
pub const MAX_PREVIEW_CHARS: usize = 2000;

pub const SCRAPE_SYSTEM_PROMPT: &str = "\
You are a data extraction assistant.
Your job is to:
1. Write Python 3 code that scrapes, downloads, or reads the data needed to answer the user's question.
2. List every pip package that must be installed for that code to run. Do not list libraries bundled with Python.
3. Extract the questions the user is asking so they can be answered once the data is collected.

You must respond only with valid JSON in this format:
{\"code\": \"string - Python code as plain text\", \"libraries\": [\"string\"], \"questions\": [\"string\"]}
Do not include explanations, comments, or any text outside the JSON.";

pub fn scrape_user_prompt(request: &QuestionRequest, folder: &str) -> String {
    format!(
        "Question:\n\
        \"{question}\"\n\n\
        Uploaded files:\n\
        {files:?}\n\n\
        URLs:\n\
        {urls:?}\n\n\
        Generate self-contained, runnable Python 3 code that collects the data required to \
        answer the question. If no URL is given, read the uploaded files instead.\n\
        Store the final dataset as \"{folder}/data.csv\". Write dataset metadata (columns, \
        dtypes, head) plus a one-line description of every file the code produces to \
        \"{folder}/metadata.txt\". Create \"{folder}\" if it does not exist.\n\
        Do not perform any analysis and do not answer the question; only collect data and metadata.",
        question = request.question,
        files = request.uploaded_files,
        urls = request.urls,
        folder = folder,
    )
}

pub fn analysis_system_prompt(folder: &str) -> String {
    format!(
        "You are a data analysis assistant.\n\
        Your job is to:\n\
        1. Write Python 3 code that answers the given questions using the provided dataset summary.\n\
        2. List every pip package the code needs. Do not list libraries bundled with Python.\n\
        3. Make the code save its answers as JSON to \"{folder}/result.json\"; encode any \
        visualisation as a base64 PNG field inside that JSON.\n\n\
        You must respond only with valid JSON in this format:\n\
        {{\"code\": \"string - Python code as plain text\", \"libraries\": [\"string\"]}}\n\
        Do not include explanations, comments, or any text outside the JSON.",
        folder = folder,
    )
}

pub fn analysis_user_prompt(questions: &[String], summary: &DatasetSummary) -> String {
    let question_block = questions
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Questions:\n{questions}\n\n\
        {summary}\n\n\
        Return JSON with the 'code' field (Python code that answers the questions and writes \
        result.json) and the 'libraries' field (pip packages it needs).",
        questions = question_block,
        summary = summary.as_prompt_text(),
    )
}

/// Header plus leading rows of a CSV file, capped at [`MAX_PREVIEW_CHARS`].
/// Input that the CSV reader cannot make sense of falls back to a plain
/// character-capped cut of the raw text.
pub fn csv_preview(raw: &str) -> String {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut lines: Vec<String> = Vec::new();
    let mut used = 0;

    if let Ok(headers) = reader.headers() {
        let header_line = headers.iter().collect::<Vec<_>>().join(",");
        // A header that alone blows the cap leaves no room for rows.
        if header_line.len() > MAX_PREVIEW_CHARS {
            return truncate_chars(raw, MAX_PREVIEW_CHARS).to_string();
        }
        if !header_line.is_empty() {
            used = header_line.len();
            lines.push(header_line);
        }
    }

    for record in reader.records() {
        let Ok(record) = record else { break };
        let line = record.iter().collect::<Vec<_>>().join(",");
        if used + line.len() + 1 > MAX_PREVIEW_CHARS {
            break;
        }
        used += line.len() + 1;
        lines.push(line);
    }

    if lines.is_empty() {
        return truncate_chars(raw, MAX_PREVIEW_CHARS).to_string();
    }

    lines.join("\n")
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
