use crate::config::CliConfig;
use crate::core::engine::AgentEngine;
use crate::core::llm::AiPipeClient;
use crate::core::pipeline::AgentPipeline;
use crate::core::workspace::Workspace;
use crate::config::cli::LocalStorage;
use crate::domain::model::QuestionRequest;
use crate::utils::validation;
use actix_cors::Cors;
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use std::sync::Arc;

pub struct AppState {
    pub config: CliConfig,
    pub llm: Arc<AiPipeClient>,
}

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    #[multipart(limit = "25MB")]
    pub file: Vec<TempFile>,
    pub question: Option<Text<String>>,
    /// Comma-separated list of source URLs.
    pub urls: Option<Text<String>>,
}

const INDEX_HTML: &str = r#"<html>
<body>
    <h2>Ask a question about your data</h2>
    <form action="/api" enctype="multipart/form-data" method="post">
        <p><input name="question" type="text" size="80" placeholder="Your question"></p>
        <p><input name="urls" type="text" size="80" placeholder="Source URLs, comma separated"></p>
        <p><input name="file" type="file" multiple></p>
        <p><input type="submit" value="Submit"></p>
    </form>
</body>
</html>
"#;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[post("/api")]
pub async fn api(
    data: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> impl Responder {
    let question = form
        .question
        .map(|q| q.into_inner())
        .unwrap_or_default()
        .trim()
        .to_string();

    let urls: Vec<String> = form
        .urls
        .map(|u| u.into_inner())
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect();

    for url in &urls {
        if let Err(e) = validation::validate_url("urls", url) {
            return HttpResponse::BadRequest().body(e.to_string());
        }
    }

    if question.is_empty() && form.file.is_empty() {
        return HttpResponse::BadRequest().body("Provide a question or at least one file");
    }

    let storage = LocalStorage::new(data.config.upload_dir.clone());
    let workspace = Workspace::create();

    let mut uploaded_files = Vec::new();
    for upload in &form.file {
        let name = upload.file_name.as_deref().unwrap_or("upload.bin");
        let bytes = match std::fs::read(upload.file.path()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Could not read buffered upload '{}': {}", name, e);
                return HttpResponse::InternalServerError().body(e.to_string());
            }
        };
        match workspace.save_upload(&storage, name, &bytes).await {
            Ok(saved) => uploaded_files.push(saved),
            Err(e) => {
                tracing::error!("Could not persist upload '{}': {}", name, e);
                return HttpResponse::InternalServerError().body(e.to_string());
            }
        }
    }

    let request = QuestionRequest {
        question,
        uploaded_files,
        urls,
    };

    tracing::info!(
        "Handling /api request: workspace={} files={} urls={}",
        workspace.id(),
        request.uploaded_files.len(),
        request.urls.len()
    );

    let pipeline = AgentPipeline::new(
        storage,
        data.config.clone(),
        data.llm.clone(),
        workspace,
    );
    let engine = AgentEngine::new(pipeline);

    match engine.run(&request).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            tracing::error!(
                "Pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            HttpResponse::InternalServerError().body(e.user_friendly_message())
        }
    }
}

pub async fn run_server(config: CliConfig, llm: AiPipeClient) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let state = web::Data::new(AppState {
        config,
        llm: Arc::new(llm),
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .service(index)
            .service(api)
    })
    .bind(bind)?
    .run()
    .await
}
