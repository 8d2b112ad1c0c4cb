use crate::classifier::{EmotionLabel, Sentiment, SentimentLabel};
use rand::Rng;

/// Source of randomness for phrase selection. Injected so tests can pin
/// exact picks; production wires in [`ThreadRngSource`].
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. Callers guarantee `len >= 1`.
    fn pick_index(&self, len: usize) -> usize;
}

pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

// -----------------------------------------------------------------------------
// Response policy
// -----------------------------------------------------------------------------

const SADNESS_RESPONSES: [&str; 3] = [
    "I'm sorry you're feeling this way. Remember, it's okay to feel sad sometimes. Would you like to talk about what's troubling you?",
    "I hear you. Sadness is a natural emotion. What's been weighing on your mind?",
    "I'm here to listen. Sometimes sharing what's bothering us can help lighten the load.",
];

const JOY_RESPONSES: [&str; 3] = [
    "That's wonderful! I'm so glad to hear you're feeling happy. What's bringing you joy today?",
    "Your positive energy is contagious! Tell me more about what's making you feel good.",
    "I love seeing you in good spirits! What's been going well for you?",
];

const ANGER_RESPONSES: [&str; 3] = [
    "I can sense you're upset. It's completely valid to feel angry. Would you like to talk about what's frustrating you?",
    "Anger is a natural response. Let's work through this together. What's triggering these feelings?",
    "I'm here to support you. Sometimes expressing anger in a safe space helps. What happened?",
];

const FEAR_RESPONSES: [&str; 3] = [
    "I understand you're feeling anxious or scared. You're not alone. What's concerning you right now?",
    "Fear can be overwhelming, but facing it together makes it more manageable. Want to share what's worrying you?",
    "It's brave of you to acknowledge your fear. Let's talk about what's making you feel this way.",
];

const SURPRISE_RESPONSES: [&str; 3] = [
    "That sounds unexpected! How are you processing this?",
    "Surprises can be intense. How are you feeling about this?",
    "I'm here to help you work through this unexpected situation.",
];

const LOVE_RESPONSES: [&str; 3] = [
    "That's beautiful! Love and connection are so important. Tell me more!",
    "It's wonderful to feel love and appreciation. What's inspiring these feelings?",
    "Love is a powerful emotion. I'm glad you're experiencing it!",
];

const NEUTRAL_RESPONSES: [&str; 3] = [
    "I'm here to listen. What's on your mind today?",
    "How can I support you today?",
    "Tell me what you'd like to talk about.",
];

/// Appended to the base response when negative sentiment confidence is high.
const SUPPORTIVE_ADDITIONS: [&str; 3] = [
    " Remember, you're stronger than you think.",
    " I'm here for you, and things can get better.",
    " You don't have to go through this alone.",
];

/// Confidence above which a negative message gets a supportive addition.
const AMPLIFY_THRESHOLD: f64 = 0.8;

pub fn responses_for(emotion: EmotionLabel) -> &'static [&'static str] {
    match emotion {
        EmotionLabel::Sadness => &SADNESS_RESPONSES,
        EmotionLabel::Joy => &JOY_RESPONSES,
        EmotionLabel::Anger => &ANGER_RESPONSES,
        EmotionLabel::Fear => &FEAR_RESPONSES,
        EmotionLabel::Surprise => &SURPRISE_RESPONSES,
        EmotionLabel::Love => &LOVE_RESPONSES,
        EmotionLabel::Neutral => &NEUTRAL_RESPONSES,
    }
}

/// Picks a reply for the detected emotion. Sentiment only matters in one
/// case: a confidently negative message gets a supportive addition glued
/// onto the base phrase.
pub fn select_response(
    emotion: EmotionLabel,
    sentiment: &Sentiment,
    rng: &dyn RandomSource,
) -> String {
    let candidates = responses_for(emotion);
    let base = candidates[rng.pick_index(candidates.len())];

    if sentiment.label == SentimentLabel::Negative && sentiment.score > AMPLIFY_THRESHOLD {
        let addition = SUPPORTIVE_ADDITIONS[rng.pick_index(SUPPORTIVE_ADDITIONS.len())];
        return format!("{}{}", base, addition);
    }

    base.to_string()
}

// -----------------------------------------------------------------------------
// Suggestion policy
// -----------------------------------------------------------------------------

const SADNESS_SUGGESTIONS: [&str; 4] = [
    "Try a 10-minute walk outside to boost your mood",
    "Listen to your favorite uplifting music",
    "Reach out to a friend or loved one",
    "Practice gratitude by writing down 3 things you're thankful for",
];

const JOY_SUGGESTIONS: [&str; 4] = [
    "Share your happiness with someone you care about",
    "Engage in an activity you love",
    "Take a moment to appreciate this positive feeling",
    "Use this positive energy to tackle a goal",
];

const ANGER_SUGGESTIONS: [&str; 4] = [
    "Try deep breathing: breathe in for 4, hold for 4, out for 4",
    "Physical exercise can help release tension",
    "Write down your feelings in a journal",
    "Take a break and do something calming",
];

const FEAR_SUGGESTIONS: [&str; 4] = [
    "Practice grounding: name 5 things you can see, 4 you can touch, 3 you can hear",
    "Try progressive muscle relaxation",
    "Talk to someone you trust about your concerns",
    "Focus on what you can control right now",
];

const NEUTRAL_SUGGESTIONS: [&str; 4] = [
    "Stay hydrated and eat nutritious meals",
    "Get some gentle exercise today",
    "Practice mindfulness for 5-10 minutes",
    "Connect with nature, even if just looking outside",
];

/// The suggestion table covers fewer moods than the emotion set; surprise
/// and love have no list of their own and fall back to neutral.
pub fn suggestions_for(mood: &str) -> &'static [&'static str] {
    match mood.to_ascii_lowercase().as_str() {
        "sadness" => &SADNESS_SUGGESTIONS,
        "joy" => &JOY_SUGGESTIONS,
        "anger" => &ANGER_SUGGESTIONS,
        "fear" => &FEAR_SUGGESTIONS,
        _ => &NEUTRAL_SUGGESTIONS,
    }
}

/// Picks a wellness suggestion for a free-form mood string.
pub fn select_suggestion(mood: &str, rng: &dyn RandomSource) -> String {
    let candidates = suggestions_for(mood);
    candidates[rng.pick_index(candidates.len())].to_string()
}
