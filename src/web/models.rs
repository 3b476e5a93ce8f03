use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Option lists shown in the settings sidebar on the index page.
pub const GENRES: [&str; 6] = [
    "Fantasy",
    "Sci-Fi",
    "Mystery",
    "Horror",
    "Romance",
    "Historical",
];
pub const TONES: [&str; 5] = ["Serious", "Humorous", "Dark", "Inspirational", "Mysterious"];
pub const LENGTHS: [&str; 3] = ["Short", "Medium", "Long"];

/// Input to the story generator. Genre, tone and length are plain strings;
/// unrecognized values degrade to a default template family instead of
/// failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRequest {
    pub prompt: String,
    pub genre: String,
    pub tone: String,
    pub length: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub genre: String,
    pub tone: String,
    pub length: String,
    pub session_id: Option<Uuid>,
}

impl GenerateRequest {
    pub fn to_story_request(&self) -> StoryRequest {
        StoryRequest {
            prompt: self.prompt.trim().to_string(),
            genre: self.genre.clone(),
            tone: self.tone.clone(),
            length: self.length.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: String,
    pub session_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}
