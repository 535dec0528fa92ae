//! Template tables for expression composition.
//!
//! `{topic}`, `{word}`, `{sensory}` and `{text}` are substituted by the composer.

use life_events::Temperament;

pub const SENSORY_WORDS: &[&str] = &[
    "cool air",
    "warmth",
    "dim light",
    "shadow",
    "thin wind",
    "still air",
    "damp earth",
    "dry ground",
    "soft ground",
    "open sky",
    "quiet brush",
    "distant rustle",
];

pub const DARK_WORDS: &[&str] = &["cool shade", "dim cover", "dark hollow"];
pub const BRIGHT_SENSORY: &[&str] = &["bright clearing", "warm sun", "open light"];
pub const BRIGHT_TOPICS: &[&str] = &["bright clearing", "warm sun patch", "open light"];
pub const NOISY_WORDS: &[&str] = &["rustling brush", "moving leaves", "stirred grass"];
pub const CALM_TOPICS: &[&str] = &["soft wind", "still air", "slow ground"];

pub const OPENERS: &[&str] = &[
    "I surface near the {sensory}.",
    "I keep low in the {sensory}.",
    "The {sensory} carries me.",
    "I pause with the {sensory}.",
    "I move with the {sensory}.",
];

pub const OBSERVATIONS: &[&str] = &[
    "The light shifts again.",
    "The air thins.",
    "The ground feels old.",
    "The wind cuts across.",
    "Something moved and stopped.",
    "The quiet stretches.",
    "The edge keeps calling.",
    "The world holds steady.",
];

pub const RESPONSES: &[&str] = &[
    "I sense that too.",
    "Same trail here.",
    "I catch it as well.",
    "I keep near.",
    "I heard that.",
    "I feel the same pull.",
];

pub const MEMORY_TEMPLATES: &[&str] = &[
    "I carry this: {text}",
    "It stays with me: {text}",
    "A memory: {text}",
];

const ECHO_TEMPLATES: &[&str] = &[
    "I keep {word} close.",
    "{word} stays on my trail.",
    "{word} lingers in me.",
    "I track {word} again.",
];

const TOPIC_TEMPLATES: &[&str] = &[
    "I return to {topic}.",
    "I drift toward {topic}.",
    "I keep near {topic}.",
    "I circle {topic}.",
];

const QUESTION_TEMPLATES: &[&str] = &[
    "Anyone near {topic}?",
    "Is {topic} safe?",
    "Do you scent {topic}?",
    "Have you seen {topic}?",
];

const MOOD_LINES: &[&str] = &[
    "I stay low.",
    "I stay still.",
    "I move when the air is ready.",
    "I keep my distance.",
    "I feel alert.",
];

const SHARED_TOPICS: &[&str] = &[
    "a water line",
    "the edge of the clearing",
    "a warm stone",
    "a narrow path",
    "fresh tracks",
    "a hollow log",
    "a high branch",
    "quiet grass",
    "moving shade",
    "soft mud",
    "the scent trail",
    "a shallow pool",
    "fallen fruit",
    "low brush",
    "a sun patch",
    "cool shade",
    "the old trail",
];

/// Topics anyone may bring up
pub fn shared_topics() -> &'static [&'static str] {
    SHARED_TOPICS
}

/// Extra topics a temperament gravitates to
pub fn topics_for(temperament: Temperament) -> &'static [&'static str] {
    match temperament {
        Temperament::Curious => &[
            "a hidden path",
            "an unfamiliar scent",
            "the far edge",
            "strange prints",
            "a new hollow",
            "the open ridge",
        ],
        Temperament::Cautious => &[
            "a safe gap",
            "thick cover",
            "the way back",
            "a quiet corner",
            "high ground",
        ],
        Temperament::Restless => &[
            "the next bend",
            "open ground",
            "the long ridge",
            "the far line",
            "a moving edge",
        ],
        Temperament::Watchful => &[
            "the tree line",
            "a shadow line",
            "the brush edge",
            "a distant shape",
            "the high branch",
        ],
        Temperament::Quiet => &[
            "still water",
            "soft moss",
            "the slow wind",
            "the hush",
            "a calm patch",
        ],
        Temperament::Playful => &[
            "a falling leaf",
            "a rolling pebble",
            "a splash",
            "a quick chase",
            "a loose twig",
        ],
        Temperament::Solitary => &[
            "a lone trail",
            "quiet shelter",
            "a private path",
            "a small den",
            "the far side",
        ],
        Temperament::Attentive => &[
            "a distant call",
            "a shifting scent",
            "the herd edge",
            "a faint crack",
            "a light stir",
        ],
        Temperament::Social => &[
            "the group",
            "a companion",
            "shared shelter",
            "a shared path",
            "the gathering spot",
        ],
        Temperament::Bold => &[
            "the open center",
            "a direct path",
            "the front edge",
            "open sky",
            "a wide crossing",
        ],
        Temperament::Gentle => &[
            "soft grass",
            "a calm place",
            "slow shade",
            "a warm patch",
            "quiet company",
        ],
        Temperament::Wary => &[
            "the escape route",
            "the high ground",
            "a narrow gap",
            "quick cover",
            "the safest line",
        ],
    }
}

pub fn topic_templates(primary: Option<Temperament>) -> &'static [&'static str] {
    match primary {
        Some(Temperament::Curious) => &[
            "I follow {topic}.",
            "I circle {topic} again.",
            "I want to know {topic}.",
        ],
        Some(Temperament::Cautious) => &[
            "I keep to {topic}.",
            "I skirt {topic}.",
            "I wait near {topic}.",
        ],
        Some(Temperament::Restless) => &[
            "I move toward {topic}.",
            "I cannot leave {topic} alone.",
            "I push past {topic}.",
        ],
        Some(Temperament::Watchful) => &[
            "I watch {topic}.",
            "I hold still by {topic}.",
            "I mark {topic} with my eyes.",
        ],
        Some(Temperament::Quiet) => &[
            "I rest near {topic}.",
            "I stay with {topic}.",
            "I settle by {topic}.",
        ],
        Some(Temperament::Playful) => &[
            "I dart around {topic}.",
            "I chase along {topic}.",
            "I turn {topic} into a game.",
        ],
        Some(Temperament::Solitary) => &[
            "I keep {topic} to myself.",
            "I stay away from {topic}.",
            "I take {topic} alone.",
        ],
        Some(Temperament::Attentive) => &[
            "I listen around {topic}.",
            "I track {topic}.",
            "I follow the signal near {topic}.",
        ],
        Some(Temperament::Social) => &[
            "I share {topic}.",
            "I look for others at {topic}.",
            "I keep close near {topic}.",
        ],
        Some(Temperament::Bold) => &[
            "I cross {topic} without pause.",
            "I go straight to {topic}.",
            "I hold the center at {topic}.",
        ],
        Some(Temperament::Gentle) => &[
            "I move softly at {topic}.",
            "I keep calm near {topic}.",
            "I stay easy around {topic}.",
        ],
        Some(Temperament::Wary) => &[
            "I keep distance from {topic}.",
            "I watch {topic} from cover.",
            "I keep an exit near {topic}.",
        ],
        None => TOPIC_TEMPLATES,
    }
}

pub fn question_templates(primary: Option<Temperament>) -> &'static [&'static str] {
    match primary {
        Some(Temperament::Curious) => &[
            "What lives near {topic}?",
            "What else hides in {topic}?",
            "Do you scent {topic}?",
        ],
        Some(Temperament::Watchful) => &["Did you see movement at {topic}?", "Is {topic} clear?"],
        Some(Temperament::Social) => &["Anyone at {topic}?", "Who is near {topic}?"],
        Some(Temperament::Wary) => &["Is {topic} safe?", "Any danger near {topic}?"],
        Some(Temperament::Bold) => &["Anyone going to {topic}?", "Who crosses {topic}?"],
        _ => QUESTION_TEMPLATES,
    }
}

pub fn mood_lines(primary: Option<Temperament>) -> &'static [&'static str] {
    match primary {
        Some(Temperament::Curious) => &["I lean in.", "I keep searching."],
        Some(Temperament::Cautious) => &["I hold back.", "I keep to cover."],
        Some(Temperament::Restless) => &["I cannot stay long.", "I range wide."],
        Some(Temperament::Watchful) => &["I watch the edges.", "I hold still and listen."],
        Some(Temperament::Quiet) => &["I keep my steps soft.", "I sink into quiet."],
        Some(Temperament::Playful) => &["I turn the moment into play.", "I dart and return."],
        Some(Temperament::Solitary) => &["I choose distance.", "I keep to myself."],
        Some(Temperament::Attentive) => &[
            "I listen for the smallest shift.",
            "I follow the faint call.",
        ],
        Some(Temperament::Social) => &["I stay with the group.", "I look for familiar bodies."],
        Some(Temperament::Bold) => &["I move first.", "I take the front."],
        Some(Temperament::Gentle) => &["I move softly.", "I keep a calm pace."],
        Some(Temperament::Wary) => &["I keep an exit close.", "I stay ready."],
        None => MOOD_LINES,
    }
}

pub fn echo_templates(primary: Option<Temperament>) -> &'static [&'static str] {
    match primary {
        Some(Temperament::Curious) => &["{word} keeps pulling me.", "I want to follow {word}."],
        Some(Temperament::Cautious) => &["I keep {word} at a distance.", "I watch for {word}."],
        Some(Temperament::Restless) => &[
            "{word} makes me move.",
            "I chase {word} through the brush.",
        ],
        Some(Temperament::Watchful) => &["I watch for {word}.", "I hold still when {word} stirs."],
        Some(Temperament::Quiet) => &["{word} settles over me.", "I keep {word} in the hush."],
        Some(Temperament::Playful) => &["{word} feels like a game.", "I dart after {word}."],
        Some(Temperament::Solitary) => &["{word} is mine alone.", "I carry {word} by myself."],
        Some(Temperament::Attentive) => &["I listen for {word}.", "{word} is a small signal."],
        Some(Temperament::Social) => &[
            "{word} brings us closer.",
            "I share {word} with the group.",
        ],
        Some(Temperament::Bold) => &["I go toward {word}.", "{word} does not stop me."],
        Some(Temperament::Gentle) => &["I hold {word} softly.", "{word} stays quiet with me."],
        Some(Temperament::Wary) => &["I stay ready for {word}.", "I keep {word} in sight."],
        None => ECHO_TEMPLATES,
    }
}
