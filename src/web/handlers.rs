use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde_json::json;
use tera::Context;
use uuid::Uuid;

use crate::web::models::{GenerateRequest, StoryResponse, GENRES, LENGTHS, TONES};
use crate::AppState;

// Index page handler
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let mut context = Context::new();
    context.insert("genres", &GENRES);
    context.insert("tones", &TONES);
    context.insert("lengths", &LENGTHS);

    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Story generation API endpoint
pub async fn generate(
    data: web::Data<AppState>,
    req: web::Json<GenerateRequest>,
) -> impl Responder {
    // Empty-prompt validation belongs to the interface layer, the generator
    // itself accepts any prompt
    if req.prompt.trim().is_empty() {
        warn!("Rejected story request with an empty prompt");
        return HttpResponse::BadRequest().json(json!({
            "error": "Please enter a prompt first!"
        }));
    }

    let session_id = req.session_id.unwrap_or_else(Uuid::new_v4);
    let request = req.to_story_request();

    info!(
        "Story request from session {}: {} {} in a {} tone",
        session_id, request.length, request.genre, request.tone
    );

    let story = data.generator.generate_story(&request).await;

    // The generator is stateless; the session keeps the last story so the
    // download endpoint can serve it
    match data.sessions.lock() {
        Ok(mut sessions) => {
            sessions.insert(session_id, story.clone());
        }
        Err(e) => {
            // Not critical if we fail to store it, the download just 404s
            error!("Failed to lock sessions mutex: {}", e);
        }
    }

    HttpResponse::Ok().json(StoryResponse { story, session_id })
}

// Download endpoint for the session's last story
pub async fn download(data: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();

    let sessions = match data.sessions.lock() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Failed to lock sessions mutex: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            }));
        }
    };

    match sessions.get(&session_id) {
        Some(story) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"generated_story.txt\"",
            ))
            .body(story.clone()),
        None => HttpResponse::NotFound().json(json!({
            "error": "No story has been generated for this session"
        })),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use actix_web::{test, web::Data, App};
    use tera::Tera;

    use super::*;
    use crate::generator::StoryGenerator;
    use crate::web::routes;

    fn app_state() -> Data<AppState> {
        let mut tera = Tera::default();
        tera.add_raw_template("index.html", "<html>{{ genres | length }}</html>")
            .unwrap();
        Data::new(AppState {
            tera,
            generator: Data::new(StoryGenerator::local_only()),
            sessions: Mutex::new(HashMap::new()),
        })
    }

    #[actix_web::test]
    async fn empty_prompt_is_rejected() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(routes::configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({
                "prompt": "   ",
                "genre": "Fantasy",
                "tone": "Serious",
                "length": "Short"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn generate_then_download_round_trip() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(routes::configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({
                "prompt": "a door that opens into yesterday",
                "genre": "Mystery",
                "tone": "Mysterious",
                "length": "Short"
            }))
            .to_request();

        let resp: StoryResponse = test::call_and_read_body_json(&app, req).await;
        assert!(resp.story.contains("a door that opens into yesterday"));

        let download = test::TestRequest::get()
            .uri(&format!("/api/story/{}/download", resp.session_id))
            .to_request();
        let download_resp = test::call_service(&app, download).await;
        assert!(download_resp.status().is_success());

        let body = test::read_body(download_resp).await;
        assert_eq!(body, web::Bytes::from(resp.story));
    }

    #[actix_web::test]
    async fn download_without_a_story_is_not_found() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(routes::configure))
                .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/story/{}/download", Uuid::new_v4()))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
