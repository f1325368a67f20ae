//! rusty-verse/crates/rv-core/src/lib.rs
//!
//! Domain models, gateway ports and the template renderer for Rusty-Verse.

pub mod catalog;
pub mod compose;
pub mod error;
pub mod models;
pub mod persona;
pub mod query;
pub mod schema;
pub mod traits;
pub mod upload;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use persona::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn poem_round_trips_through_store_json() {
        let row = serde_json::json!({
            "id": uuid::Uuid::now_v7().to_string(),
            "title": "思乡愁",
            "content": "思乡惹离愁，\n秋风落叶稠。",
            "style": "classical",
            "theme": "思乡",
            "mood": "melancholic",
            "author_id": "demo-user",
            "is_public": true,
            "likes_count": 3,
            "views_count": 9,
            "created_at": "2024-05-01T10:00:00.000000Z",
        });
        let poem: Poem = serde_json::from_value(row).unwrap();
        assert_eq!(poem.style, Style::Classical);
        assert_eq!(poem.mood, Some(Mood::Melancholic));
        assert_eq!(poem.likes_count, 3);
    }

    #[test]
    fn labels_parse_and_display() {
        for style in Style::ALL {
            assert_eq!(style.to_string().parse::<Style>().unwrap(), style);
        }
        let err = "sonnet".parse::<Style>().unwrap_err();
        assert_eq!(err, UnknownLabel("sonnet".into()));
        assert_eq!(err.to_string(), "unknown label 'sonnet'");
        assert_eq!("passionate".parse::<Mood>().unwrap(), Mood::Passionate);
    }
}
