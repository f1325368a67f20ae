use std::sync::Arc;

use crate::models::{GeneratedPoem, Mood, Style};
use crate::traits::{TemplatePicker, Tokenizer};

use super::picker::RandomPicker;
use super::retrieval::{self, CjkRunTokenizer, FILLER_REPLIES, LINE_JOINER};
use super::templates::{PoemTemplates, FALLBACK, THEME_PLACEHOLDER};
use super::voices::{self, GENERIC_REPLY, MESSAGE_PLACEHOLDER};

/// Turns templates plus user text into poems and persona replies.
///
/// Pure apart from the injected picker; safe to share across tasks.
#[derive(Clone)]
pub struct Renderer {
    poems: PoemTemplates,
    picker: Arc<dyn TemplatePicker>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Renderer {
    pub fn new(
        poems: PoemTemplates,
        picker: Arc<dyn TemplatePicker>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            poems,
            picker,
            tokenizer,
        }
    }

    /// Builtin templates, uniform random picks, CJK-run keywords.
    pub fn builtin() -> Self {
        Self::new(
            PoemTemplates::builtin(),
            Arc::new(RandomPicker),
            Arc::new(CjkRunTokenizer::new()),
        )
    }

    /// Same templates and tokenizer with a different picker.
    pub fn with_picker(mut self, picker: Arc<dyn TemplatePicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Renders the template for (style, mood). `theme` must already be
    /// non-blank; it is inserted verbatim.
    pub fn compose_poem(&self, style: Style, mood: Mood, theme: &str) -> GeneratedPoem {
        let template = self.poems.lookup(style, mood);
        GeneratedPoem {
            title: template.title.replace(THEME_PLACEHOLDER, theme),
            content: template.content.replace(THEME_PLACEHOLDER, theme),
        }
    }

    /// Variant taking raw labels; anything unrecognised gets the fallback entry.
    pub fn compose_poem_from_labels(&self, style: &str, mood: &str, theme: &str) -> GeneratedPoem {
        match (style.parse::<Style>(), mood.parse::<Mood>()) {
            (Ok(style), Ok(mood)) => self.compose_poem(style, mood, theme),
            _ => GeneratedPoem {
                title: FALLBACK.title.replace(THEME_PLACEHOLDER, theme),
                content: FALLBACK.content.replace(THEME_PLACEHOLDER, theme),
            },
        }
    }

    /// Picker index clamped to the last candidate.
    fn pick(&self, len: usize) -> usize {
        self.picker.pick(len).min(len - 1)
    }

    /// Reply in the voice of a historical poet. Unknown names get the
    /// generic reply.
    pub fn poet_reply(&self, poet_name: &str, message: &str) -> String {
        let template = match voices::voice_for(poet_name) {
            Some(voice) => voice.replies[self.pick(voice.replies.len())],
            None => GENERIC_REPLY,
        };
        template.replace(MESSAGE_PLACEHOLDER, message)
    }

    /// Reply for a custom agent from its training texts.
    pub fn agent_reply(&self, message: &str, training: &[String]) -> String {
        let keywords = self.tokenizer.keywords(message);
        let lines = retrieval::matching_lines(&keywords, training);
        if lines.is_empty() {
            return FILLER_REPLIES[self.pick(FILLER_REPLIES.len())].to_string();
        }
        lines.join(LINE_JOINER)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("poems", &self.poems).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::picker::FixedPicker;
    use crate::compose::voices::VOICES;
    use crate::traits::MockTemplatePicker;

    fn pinned(index: usize) -> Renderer {
        Renderer::builtin().with_picker(Arc::new(FixedPicker(index)))
    }

    #[test]
    fn homesick_classical_melancholic() {
        let poem = Renderer::builtin().compose_poem(Style::Classical, Mood::Melancholic, "思乡");
        assert_eq!(poem.title, "思乡愁");
        assert_eq!(poem.content, "思乡惹离愁，\n秋风落叶稠。\n天涯孤旅客，\n何处是归舟。");
    }

    #[test]
    fn every_pair_renders_the_theme() {
        let renderer = Renderer::builtin();
        for style in Style::ALL {
            for mood in Mood::ALL {
                let poem = renderer.compose_poem(style, mood, "明月");
                assert!(!poem.title.is_empty(), "{style}/{mood}");
                assert!(!poem.content.is_empty(), "{style}/{mood}");
                assert!(poem.content.contains("明月"), "{style}/{mood}");
                assert!(!poem.content.contains(THEME_PLACEHOLDER));
            }
        }
    }

    #[test]
    fn poem_generation_is_repeatable() {
        let renderer = Renderer::builtin();
        let a = renderer.compose_poem(Style::Haiku, Mood::Romantic, "樱花");
        let b = renderer.compose_poem(Style::Haiku, Mood::Romantic, "樱花");
        assert_eq!(a, b);
    }

    #[test]
    fn theme_is_inserted_verbatim() {
        let theme = "<b>{theme}</b>";
        let poem = Renderer::builtin().compose_poem(Style::Modern, Mood::Joyful, theme);
        assert_eq!(poem.title, "<b>{theme}</b>的欢歌");
    }

    #[test]
    fn unknown_labels_fall_back_to_modern_peaceful() {
        let renderer = Renderer::builtin();
        let expected = renderer.compose_poem(Style::Modern, Mood::Peaceful, "海");
        assert_eq!(renderer.compose_poem_from_labels("sonnet", "peaceful", "海"), expected);
        assert_eq!(renderer.compose_poem_from_labels("haiku", "furious", "海"), expected);
        assert_ne!(renderer.compose_poem_from_labels("haiku", "peaceful", "海"), expected);
    }

    #[test]
    fn sparse_tables_fall_back_to_modern_peaceful() {
        static EMPTY: &[(Style, Mood, crate::compose::PoemTemplate)] = &[];
        let renderer = Renderer::new(
            PoemTemplates::from_static(EMPTY),
            Arc::new(FixedPicker(0)),
            Arc::new(CjkRunTokenizer::new()),
        );
        let poem = renderer.compose_poem(Style::Classical, Mood::Passionate, "海");
        assert_eq!(poem.title, "海的沉思");
        assert!(poem.content.starts_with("在海的怀抱中\n"));
    }

    #[test]
    fn picker_index_selects_template() {
        let li_bai = &VOICES[0];
        assert_eq!(
            pinned(0).poet_reply("李白", "好诗"),
            li_bai.replies[0].replace(MESSAGE_PLACEHOLDER, "好诗")
        );
        assert_eq!(
            pinned(2).poet_reply("李白", "好诗"),
            li_bai.replies[2].replace(MESSAGE_PLACEHOLDER, "好诗")
        );
    }

    #[test]
    fn picker_is_asked_for_three_candidates() {
        let mut picker = MockTemplatePicker::new();
        picker.expect_pick().withf(|len| *len == 3).times(1).return_const(1usize);
        let renderer = Renderer::builtin().with_picker(Arc::new(picker));
        let reply = renderer.poet_reply("王维", "山水");
        assert!(reply.starts_with("阿弥陀佛。山水"));
    }

    #[test]
    fn overshooting_picker_lands_on_the_last_template() {
        let mut picker = MockTemplatePicker::new();
        picker.expect_pick().return_const(9usize);
        let renderer = Renderer::builtin().with_picker(Arc::new(picker));
        assert_eq!(
            renderer.poet_reply("李白", "酒"),
            VOICES[0].replies[2].replace(MESSAGE_PLACEHOLDER, "酒")
        );
    }

    #[test]
    fn unknown_poet_gets_generic_reply() {
        let reply = pinned(0).poet_reply("陶渊明", "采菊东篱下");
        assert_eq!(reply, "采菊东篱下，你说得很有道理。让我们继续探讨诗词之道吧。");
        assert_eq!(reply.matches("采菊东篱下").count(), 1);
    }

    #[test]
    fn agent_reply_quotes_matching_training_line() {
        let training = vec!["冬天很冷\n春天的风很温柔\n夏天很热".to_string()];
        let reply = pinned(0).agent_reply("聊聊，春天！", &training);
        assert!(reply.contains("春天的风很温柔"));
        assert!(!reply.contains("冬天"));
    }

    #[test]
    fn agent_reply_joins_matches_with_full_width_period() {
        let training = vec!["春天来了\n春天走了".to_string()];
        assert_eq!(pinned(0).agent_reply("春天", &training), "春天来了。春天走了");
    }

    #[test]
    fn agent_reply_without_overlap_is_filler() {
        let training = vec!["春天的风很温柔".to_string()];
        let reply = Renderer::builtin().agent_reply("秋月", &training);
        assert!(FILLER_REPLIES.contains(&reply.as_str()));

        let reply = pinned(1).agent_reply("春天", &[]);
        assert_eq!(reply, FILLER_REPLIES[1]);
    }
}
