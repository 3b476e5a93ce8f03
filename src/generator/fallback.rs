//! Deterministic local story assembly, used whenever no remote completion is
//! available. Template indices derive from a stable content hash, so the same
//! request produces the same story across process runs.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::web::models::StoryRequest;

// Opening paragraphs, three per genre. Every template embeds the prompt once.
const FANTASY_OPENINGS: [&str; 3] = [
    "In a realm where {prompt}, magic flowed through the land like unseen rivers. The prophecy had spoken of this moment for centuries.",
    "The ancient scroll foretold: '{prompt}'. On the darkest night, the heroes assembled, knowing their fate was sealed.",
    "A whispered rumor spread through the kingdom: {prompt}. None dared speak it aloud.",
];

const SCI_FI_OPENINGS: [&str; 3] = [
    "The star charts aligned with an impossible pattern. Scientists confirmed it: {prompt}. Humanity would never be the same.",
    "Dr. Chen's scanner beeped three times. The reading was impossible: {prompt}. She stared at the data in disbelief.",
    "Year 2287: {prompt}. The transmission crackled across the void, changing everything they thought they knew.",
];

const MYSTERY_OPENINGS: [&str; 3] = [
    "The case arrived on Detective Morgan's desk with no explanation: {prompt}. Her hands trembled as she opened the file.",
    "No one wanted to talk about it, but everyone knew: {prompt}. The truth was buried somewhere in the shadows.",
    "Three clues. One victim. One question: {prompt}. The investigation had only just begun.",
];

const HORROR_OPENINGS: [&str; 3] = [
    "The first sign was subtle: {prompt}. By the time anyone noticed, it was already too late.",
    "They say that {prompt} was just the beginning. The nightmare had only just woken.",
    "In the dead of night, whispers told of {prompt}. No one dared investigate—not after what happened to the last person who did.",
];

const ROMANCE_OPENINGS: [&str; 3] = [
    "Two souls crossed paths because of {prompt}. Neither expected to find what they were truly seeking.",
    "It started with {prompt}. Neither of them believed in fate, but the universe had other plans.",
    "Against all odds, {prompt} brought them together. What happened next neither could have predicted.",
];

const HISTORICAL_OPENINGS: [&str; 3] = [
    "In the annals of history, {prompt} marked a turning point. Few knew the truth behind the legend.",
    "The year was darker than most, and {prompt} echoed through the chronicles of time.",
    "Historians would later argue about {prompt}, but those who lived it knew the real story.",
];

// Body paragraphs are genre-independent. The early set frames setup and
// complication, the late set climax and revelation.
const EARLY_BODY_TEMPLATES: [&str; 4] = [
    "As the events unfolded, it became clear that {prompt} was only the beginning. Deeper layers of complexity emerged.",
    "The implications of {prompt} spread like ripples across a still pond. Unexpected consequences followed.",
    "Few understood the significance of {prompt}. Fewer still could have predicted what came next.",
    "Time seemed to move differently after {prompt}. The world had shifted in subtle but profound ways.",
];

const LATE_BODY_TEMPLATES: [&str; 4] = [
    "The truth about {prompt} was finally coming into focus. Pieces fell into place like a puzzle long unsolved.",
    "What seemed impossible became reality. {prompt} wasn't just an event—it was a revelation.",
    "In that moment, when {prompt} became undeniable, everything changed. There was no going back.",
    "The culmination of {prompt} brought clarity. All the doubt, all the fear—it crystallized into truth.",
];

// Closing paragraphs, three per tone. Mysterious has no table of its own and
// closes on the Serious set.
const SERIOUS_CLOSINGS: [&str; 3] = [
    "The weight of {prompt} settled upon them like an eternal burden. Some lessons, once learned, could never be unlearned.",
    "And so {prompt} became part of the tapestry of their lives—indelible and unchangeable.",
    "When the dust settled, {prompt} had left its mark. The world would remember.",
];

const HUMOROUS_CLOSINGS: [&str; 3] = [
    "In the end, {prompt} turned out to be far more absurd than anyone had imagined. Nobody saw the punchline coming.",
    "If someone had told them that {prompt} would lead here, they would have laughed. Well, here they were.",
    "The moral of the story was simple: {prompt} was funnier in hindsight than it was in the moment.",
];

const DARK_CLOSINGS: [&str; 3] = [
    "The shadows around {prompt} never fully lifted. Some truths were too dark to fully illuminate.",
    "In the darkness after {prompt}, they found only silence and the echo of what might have been.",
    "{prompt} had changed them. Whether for better or worse, no one could say.",
];

const INSPIRATIONAL_CLOSINGS: [&str; 3] = [
    "{prompt} had shown them what they were truly capable of. The journey had only just begun.",
    "From {prompt}, hope emerged. And with hope came possibility.",
    "The lesson of {prompt} would stay with them forever: triumph comes to those brave enough to face the unknown.",
];

/// Assemble a story from the template tables: one opening, a length-dependent
/// run of body paragraphs, one closing, joined by blank lines.
pub fn assemble_story(request: &StoryRequest) -> String {
    let mut paragraphs = Vec::new();

    paragraphs.push(opening(&request.prompt, &request.genre));

    let total = body_count(&request.length);
    for number in 1..=total {
        paragraphs.push(body_paragraph(&request.prompt, number, total));
    }

    paragraphs.push(closing(&request.prompt, &request.tone));

    paragraphs.join("\n\n")
}

/// FxHash of the text bytes. The output is fixed for a given input across
/// process runs, which keeps template selection reproducible.
fn stable_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    hasher.finish()
}

fn body_count(length: &str) -> usize {
    match length.to_lowercase().as_str() {
        "short" => 2,
        "long" => 5,
        _ => 3,
    }
}

fn opening(prompt: &str, genre: &str) -> String {
    let templates = opening_templates(genre);
    let index = stable_hash(prompt) as usize % templates.len();
    fill(templates[index], prompt)
}

fn body_paragraph(prompt: &str, number: usize, total: usize) -> String {
    // First half of the body complicates, second half resolves.
    let templates = if 2 * number <= total {
        &EARLY_BODY_TEMPLATES
    } else {
        &LATE_BODY_TEMPLATES
    };
    let index = stable_hash(&format!("{}{}", prompt, number)) as usize % templates.len();
    fill(templates[index], prompt)
}

fn closing(prompt: &str, tone: &str) -> String {
    let templates = closing_templates(tone);
    let index = stable_hash(prompt) as usize % templates.len();
    fill(templates[index], prompt)
}

fn opening_templates(genre: &str) -> &'static [&'static str; 3] {
    match genre {
        "Sci-Fi" => &SCI_FI_OPENINGS,
        "Mystery" => &MYSTERY_OPENINGS,
        "Horror" => &HORROR_OPENINGS,
        "Romance" => &ROMANCE_OPENINGS,
        "Historical" => &HISTORICAL_OPENINGS,
        // Unrecognized genres degrade to the Fantasy set
        _ => &FANTASY_OPENINGS,
    }
}

fn closing_templates(tone: &str) -> &'static [&'static str; 3] {
    match tone {
        "Humorous" => &HUMOROUS_CLOSINGS,
        "Dark" => &DARK_CLOSINGS,
        "Inspirational" => &INSPIRATIONAL_CLOSINGS,
        // Unrecognized tones degrade to the Serious set
        _ => &SERIOUS_CLOSINGS,
    }
}

fn fill(template: &str, prompt: &str) -> String {
    template.replace("{prompt}", prompt)
}
