//! # rv-api Handlers
//!
//! Each handler pulls the actor and the inputs out of the request, calls one
//! service operation and renders the result as JSON.

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use rv_core::models::{Actor, Style};
use rv_core::persona::{PersonaKind, PersonaRef};
use rv_core::upload::UploadedFile;
use rv_services::{NewAgentRequest, PoemDraft, Services};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Header naming the acting user; the configured default applies otherwise.
pub const USER_HEADER: &str = "X-User-Id";

/// State shared across all Actix-web workers.
pub struct AppState {
    pub services: Services,
    pub default_actor: Actor,
}

impl AppState {
    fn actor(&self, req: &HttpRequest) -> Actor {
        req.headers()
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(Actor::new)
            .unwrap_or_else(|| self.default_actor.clone())
    }
}

// ── Poems ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub style: String,
    pub mood: String,
    pub theme: String,
}

pub async fn generate_poem(
    data: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> ApiResult<HttpResponse> {
    let poem = data
        .services
        .creation
        .generate_from_labels(&body.style, &body.mood, &body.theme)?;
    Ok(HttpResponse::Ok().json(poem))
}

pub async fn save_poem(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<PoemDraft>,
) -> ApiResult<HttpResponse> {
    let actor = data.actor(&req);
    let poem = data.services.creation.save(&actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(poem))
}

#[derive(Debug, Deserialize)]
pub struct GalleryFilter {
    pub style: Option<String>,
}

pub async fn list_poems(
    data: web::Data<AppState>,
    filter: web::Query<GalleryFilter>,
) -> ApiResult<HttpResponse> {
    // "all" and an empty value both mean no filter.
    let style = match filter.style.as_deref() {
        None | Some("") | Some("all") => None,
        Some(label) => Some(
            label
                .parse::<Style>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
        ),
    };
    let poems = data.services.gallery.list(style).await?;
    Ok(HttpResponse::Ok().json(poems))
}

pub async fn like_poem(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = data.actor(&req);
    let poem = data.services.gallery.like(&actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(poem))
}

pub async fn view_poem(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = data.actor(&req);
    let poem = data.services.gallery.view(&actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(poem))
}

// ── Collections & profile ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewCollectionRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn list_collections(data: web::Data<AppState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let actor = data.actor(&req);
    let collections = data.services.collections.list(&actor).await?;
    Ok(HttpResponse::Ok().json(collections))
}

pub async fn create_collection(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NewCollectionRequest>,
) -> ApiResult<HttpResponse> {
    let actor = data.actor(&req);
    let body = body.into_inner();
    let collection = data
        .services
        .collections
        .create(&actor, &body.name, body.description)
        .await?;
    Ok(HttpResponse::Created().json(collection))
}

pub async fn delete_collection(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    data.services.collections.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn profile(data: web::Data<AppState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let actor = data.actor(&req);
    let overview = data.services.profile.overview(&actor).await?;
    Ok(HttpResponse::Ok().json(overview))
}

// ── Chat ────────────────────────────────────────────────────────────────────

pub async fn list_poets(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let poets = data.services.chat.list_poets().await?;
    Ok(HttpResponse::Ok().json(poets))
}

fn persona_ref(path: web::Path<(String, Uuid)>) -> ApiResult<PersonaRef> {
    let (kind, id) = path.into_inner();
    let kind = kind
        .parse::<PersonaKind>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(PersonaRef::new(kind, id))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

pub async fn conversation(
    data: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
) -> ApiResult<HttpResponse> {
    let persona = persona_ref(path)?;
    let messages = data.services.chat.conversation(persona).await?;
    Ok(HttpResponse::Ok().json(messages))
}

pub async fn send_message(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, Uuid)>,
    body: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let persona = persona_ref(path)?;
    let actor = data.actor(&req);
    let messages = data.services.chat.send(&actor, persona, &body.message).await?;
    Ok(HttpResponse::Ok().json(messages))
}

pub async fn clear_conversation(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, Uuid)>,
) -> ApiResult<HttpResponse> {
    let persona = persona_ref(path)?;
    let actor = data.actor(&req);
    let removed = data.services.chat.clear(&actor, persona).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed": removed })))
}

// ── Agents ──────────────────────────────────────────────────────────────────

pub async fn list_agents(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let agents = data.services.agents.list().await?;
    Ok(HttpResponse::Ok().json(agents))
}

pub async fn create_agent(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NewAgentRequest>,
) -> ApiResult<HttpResponse> {
    let actor = data.actor(&req);
    let agent = data.services.agents.create(&actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(agent))
}

pub async fn delete_agent(data: web::Data<AppState>, path: web::Path<Uuid>) -> ApiResult<HttpResponse> {
    data.services.agents.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn training_files(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let files = data.services.agents.training_files(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(files))
}

pub async fn upload_training_files(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let files = read_files(payload).await?;
    let stored = data.services.agents.upload(path.into_inner(), files).await?;
    Ok(HttpResponse::Created().json(stored))
}

pub async fn delete_training_file(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    data.services.agents.delete_training_file(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Collects every file part of the form. Parts without a file name are
/// ignored.
async fn read_files(mut payload: Multipart) -> ApiResult<Vec<UploadedFile>> {
    let mut files = Vec::new();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::bad_request(e.to_string()))?;
        let Some(file_name) = field.content_disposition().get_filename().map(str::to_string) else {
            continue;
        };
        let content_type = declared_type(field.content_type(), &file_name);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ApiError::bad_request(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }
        files.push(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Ok(files)
}

/// Content type of an uploaded part. Generic binary types are replaced by a
/// guess from the file name, the way browsers label files.
fn declared_type(declared: Option<&mime_guess::Mime>, file_name: &str) -> Option<String> {
    match declared {
        Some(mime) if *mime != mime_guess::mime::APPLICATION_OCTET_STREAM => Some(mime.to_string()),
        _ => mime_guess::from_path(file_name).first().map(|m| m.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octet_stream_is_replaced_by_a_guess() {
        let octet = mime_guess::mime::APPLICATION_OCTET_STREAM;
        assert_eq!(declared_type(Some(&octet), "notes.txt").as_deref(), Some("text/plain"));
        assert_eq!(declared_type(None, "blob.zzz"), None);

        let pdf: mime_guess::Mime = "application/pdf".parse().unwrap();
        assert_eq!(declared_type(Some(&pdf), "a.txt").as_deref(), Some("application/pdf"));
    }
}
