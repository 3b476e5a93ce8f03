mod generator;
mod web;

use actix_web::{App, HttpServer, web::Data};
use actix_files as fs;
use dotenv::dotenv;
use log::{info, error};
use std::sync::Mutex;
use std::collections::HashMap;
use tera::Tera;
use uuid::Uuid;

use generator::StoryGenerator;
use web::routes;

// App state structure
struct AppState {
    tera: Tera,
    generator: Data<StoryGenerator>,
    sessions: Mutex<HashMap<Uuid, String>>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting story generator web application");

    // Configuration is read once here; the generator stays immutable for the
    // process lifetime
    let generator = Data::new(StoryGenerator::from_env());

    // Initialize template engine
    let mut tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
    };
    tera.autoescape_on(vec![".html", ".sql"]);

    // Create app state
    let app_state = Data::new(AppState {
        tera,
        generator: generator.clone(),
        sessions: Mutex::new(HashMap::new()),
    });

    // Start web server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(generator.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", "./static").show_files_listing())
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
