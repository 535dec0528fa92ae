//! Expression Composer
//!
//! Turns world signals, memory, temperament and peers' public posts into one to
//! three short sentences. Composition only ever sees the posts it is handed,
//! never another agent's internal state.

pub mod templates;

use rand::seq::SliceRandom;
use rand::Rng;

use life_events::{PeerPost, Temperament, WorldSignals};

use crate::memory::MemoryStore;

/// Chance an echo also carries a stock acknowledgement
const ECHO_RESPONSE_CHANCE: f64 = 0.45;
/// Chance an echo also carries a topic line
const ECHO_TOPIC_CHANCE: f64 = 0.35;
/// Chance the topic comes from the surroundings instead of the topic pool
const ENVIRONMENT_TOPIC_CHANCE: f64 = 0.25;
/// Chance of a closing observation when no mood line was added
const OBSERVATION_CHANCE: f64 = 0.25;
/// Longest word lifted from a peer's post
const MAX_ECHO_WORD_CHARS: usize = 18;

/// How a temperament speaks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceProfile {
    pub max_sentences: usize,
    pub greet_chance: f64,
    pub echo_chance: f64,
    pub memory_chance: f64,
    pub question_chance: f64,
    pub mood_chance: f64,
}

impl VoiceProfile {
    pub const DEFAULT: VoiceProfile = VoiceProfile {
        max_sentences: 3,
        greet_chance: 0.2,
        echo_chance: 0.5,
        memory_chance: 0.25,
        question_chance: 0.25,
        mood_chance: 0.2,
    };

    /// Voice for a primary temperament; temperaments without their own voice
    /// (and agents with none) use [`VoiceProfile::DEFAULT`].
    pub fn for_temperament(primary: Option<Temperament>) -> VoiceProfile {
        match primary {
            Some(Temperament::Quiet) => VoiceProfile {
                max_sentences: 2,
                greet_chance: 0.1,
                echo_chance: 0.35,
                memory_chance: 0.2,
                question_chance: 0.1,
                mood_chance: 0.25,
            },
            Some(Temperament::Solitary) => VoiceProfile {
                max_sentences: 2,
                greet_chance: 0.05,
                echo_chance: 0.25,
                memory_chance: 0.2,
                question_chance: 0.1,
                mood_chance: 0.2,
            },
            Some(Temperament::Social) => VoiceProfile {
                max_sentences: 3,
                greet_chance: 0.35,
                echo_chance: 0.7,
                memory_chance: 0.25,
                question_chance: 0.35,
                mood_chance: 0.2,
            },
            Some(Temperament::Playful) => VoiceProfile {
                max_sentences: 3,
                greet_chance: 0.3,
                echo_chance: 0.6,
                memory_chance: 0.2,
                question_chance: 0.25,
                mood_chance: 0.3,
            },
            Some(Temperament::Bold) => VoiceProfile {
                max_sentences: 3,
                greet_chance: 0.2,
                echo_chance: 0.5,
                memory_chance: 0.2,
                question_chance: 0.25,
                mood_chance: 0.25,
            },
            Some(Temperament::Wary) => VoiceProfile {
                max_sentences: 2,
                greet_chance: 0.1,
                echo_chance: 0.4,
                memory_chance: 0.25,
                question_chance: 0.2,
                mood_chance: 0.25,
            },
            _ => VoiceProfile::DEFAULT,
        }
    }
}

/// Compose an expression.
///
/// Always returns at least one sentence and never more than the voice allows.
pub fn compose<R: Rng>(
    world: &WorldSignals,
    memory: &MemoryStore,
    peers: &[PeerPost],
    temperament: &[Temperament],
    rng: &mut R,
) -> Vec<String> {
    let primary = temperament.first().copied();
    let voice = VoiceProfile::for_temperament(primary);
    let topic = pick_topic(world, temperament, rng);
    let max_sentences = voice.max_sentences.max(1);

    if !peers.is_empty() && rng.gen::<f64>() < voice.echo_chance {
        if let Some(line) = peers.choose(rng).and_then(|post| post.sentences.choose(rng)) {
            let mut sentences = vec![echo_fragment(line, primary, rng)];
            if rng.gen::<f64>() < ECHO_RESPONSE_CHANCE {
                sentences.push(pick(templates::RESPONSES, rng).to_string());
            }
            if rng.gen::<f64>() < ECHO_TOPIC_CHANCE {
                sentences.push(topic_line(primary, topic, rng));
            }
            if rng.gen::<f64>() < voice.mood_chance {
                sentences.push(pick(templates::mood_lines(primary), rng).to_string());
            }
            sentences.truncate(rng.gen_range(1..=max_sentences));
            return sentences;
        }
    }

    let mut sentences = Vec::new();
    if rng.gen::<f64>() < voice.greet_chance {
        sentences.push(opening_line(world, rng));
    }
    sentences.push(topic_line(primary, topic, rng));

    let salient = memory.most_salient(3);
    if !salient.is_empty() && rng.gen::<f64>() < voice.memory_chance {
        if let Some(remembered) = salient.choose(rng) {
            let template = pick(templates::MEMORY_TEMPLATES, rng);
            sentences.push(template.replace("{text}", &remembered.text));
        }
    } else if rng.gen::<f64>() < voice.question_chance {
        sentences.push(pick(templates::question_templates(primary), rng).replace("{topic}", topic));
    }

    if rng.gen::<f64>() < voice.mood_chance {
        sentences.push(pick(templates::mood_lines(primary), rng).to_string());
    } else if rng.gen::<f64>() < OBSERVATION_CHANCE {
        sentences.push(pick(templates::OBSERVATIONS, rng).to_string());
    }

    sentences.truncate(rng.gen_range(1..=max_sentences));
    sentences
}

fn pick<R: Rng>(options: &'static [&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or("")
}

fn sensory_word<R: Rng>(world: &WorldSignals, rng: &mut R) -> &'static str {
    if world.light_level < 0.35 {
        pick(templates::DARK_WORDS, rng)
    } else if world.light_level > 0.8 {
        pick(templates::BRIGHT_SENSORY, rng)
    } else if world.environmental_noise > 0.55 {
        pick(templates::NOISY_WORDS, rng)
    } else {
        pick(templates::SENSORY_WORDS, rng)
    }
}

fn environment_topic<R: Rng>(world: &WorldSignals, rng: &mut R) -> &'static str {
    if world.light_level < 0.35 {
        pick(templates::DARK_WORDS, rng)
    } else if world.light_level > 0.8 {
        pick(templates::BRIGHT_TOPICS, rng)
    } else if world.environmental_noise > 0.55 {
        pick(templates::NOISY_WORDS, rng)
    } else {
        pick(templates::CALM_TOPICS, rng)
    }
}

fn pick_topic<R: Rng>(
    world: &WorldSignals,
    temperament: &[Temperament],
    rng: &mut R,
) -> &'static str {
    if rng.gen::<f64>() < ENVIRONMENT_TOPIC_CHANCE {
        return environment_topic(world, rng);
    }
    let pool: Vec<&'static str> = templates::shared_topics()
        .iter()
        .chain(temperament.iter().flat_map(|t| templates::topics_for(*t).iter()))
        .copied()
        .collect();
    match pool.choose(rng) {
        Some(topic) => *topic,
        None => environment_topic(world, rng),
    }
}

fn opening_line<R: Rng>(world: &WorldSignals, rng: &mut R) -> String {
    let sensory = sensory_word(world, rng);
    pick(templates::OPENERS, rng).replace("{sensory}", sensory)
}

fn topic_line<R: Rng>(primary: Option<Temperament>, topic: &str, rng: &mut R) -> String {
    pick(templates::topic_templates(primary), rng).replace("{topic}", topic)
}

/// Lift one content word out of a peer's sentence and echo it in our own voice.
fn echo_fragment<R: Rng>(line: &str, primary: Option<Temperament>, rng: &mut R) -> String {
    let words: Vec<&str> = line
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .map(|w| w.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | '"' | '\'')))
        .filter(|w| !w.is_empty())
        .collect();
    match words.choose(rng) {
        Some(word) => {
            let word: String = word.chars().take(MAX_ECHO_WORD_CHARS).collect();
            pick(templates::echo_templates(primary), rng).replace("{word}", &word)
        }
        None => pick(templates::RESPONSES, rng).to_string(),
    }
}
