//! Phrase generation for detected objects.
//!
//! A static table maps well-known object names to sets of conversational
//! phrases; one is picked uniformly at random per lookup. Unknown objects
//! get a generic template with the object name substituted in.

use rand::seq::SliceRandom;

// ---------------------------------------------------------------------------
// Phrase tables
// ---------------------------------------------------------------------------

/// Domain-specific phrase sets, keyed by lower-cased object name.
const PHRASE_SETS: &[(&str, &[&str])] = &[
    (
        "tv",
        &[
            "I wonder what's on tonight?",
            "That screen looks perfect for movie nights!",
            "Streaming or cable these days?",
            "The picture quality looks great from here!",
            "Binge-watching anything interesting lately?",
        ],
    ),
    (
        "television",
        &[
            "What's your current show obsession?",
            "That's a nice setup for entertainment!",
            "Sports or series kind of person?",
            "The viewing angle looks perfect!",
            "Smart TV features are amazing these days!",
        ],
    ),
    (
        "street",
        &[
            "This neighborhood has such character!",
            "I bet this gets lively during festivals!",
            "The architecture here tells a story!",
            "Perfect for evening strolls, I imagine!",
            "This area must have great local spots!",
        ],
    ),
    (
        "road",
        &[
            "This path must lead somewhere interesting!",
            "The way the light hits this road is beautiful!",
            "I wonder what stories this road could tell!",
            "Perfect for a peaceful drive!",
            "This looks like a route with great views!",
        ],
    ),
    (
        "car",
        &[
            "That's a beautiful machine!",
            "The design really catches the eye!",
            "I bet that's fun to drive!",
            "The color choice is perfect!",
            "That looks like it has some serious power!",
        ],
    ),
    (
        "plant",
        &[
            "Nature's artwork right there!",
            "That's thriving beautifully!",
            "The way plants bring life to a space is amazing!",
            "Someone has a real green thumb!",
            "The natural beauty is so calming!",
        ],
    ),
    (
        "book",
        &[
            "There's nothing quite like a good book!",
            "I wonder what world that one opens up!",
            "The best adventures start with turning a page!",
            "Books are like portable magic, aren't they?",
            "That looks like it could be a real page-turner!",
        ],
    ),
    (
        "laptop",
        &[
            "The gateway to endless possibilities!",
            "I wonder what amazing things are being created on that!",
            "Technology that fits your lifestyle perfectly!",
            "That looks like a productivity powerhouse!",
            "The modern workspace in portable form!",
        ],
    ),
    (
        "phone",
        &[
            "Your connection to the whole world!",
            "The technology in our pockets is incredible!",
            "That's probably got some amazing photos on it!",
            "Communication evolution in your hand!",
            "The way these devices shape our daily lives is fascinating!",
        ],
    ),
    (
        "record player",
        &[
            "There's something magical about analog sound!",
            "Music the way it was meant to be experienced!",
            "That's a beautiful piece of audio history!",
            "The ritual of playing vinyl is so satisfying!",
            "Nothing beats that warm, rich sound!",
        ],
    ),
    (
        "speaker",
        &[
            "Ready to fill the space with amazing sound!",
            "Music becomes an experience with good speakers!",
            "The engineering in modern audio is incredible!",
            "That's going to make everything sound amazing!",
            "Perfect for bringing music to life!",
        ],
    ),
];

/// Generic templates for objects not in the table. `{}` is replaced by
/// the object name.
const GENERIC_TEMPLATES: &[&str] = &[
    "That {} has such interesting character!",
    "I find the design of that {} quite fascinating!",
    "There's something special about how that {} fits in this space!",
    "The way that {} catches the light is beautiful!",
    "That {} tells its own unique story!",
    "I wonder about the story behind that {}!",
    "The craftsmanship of that {} is impressive!",
];

// ---------------------------------------------------------------------------
// PhraseBook
// ---------------------------------------------------------------------------

/// Picks a spoken phrase for a detected object.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhraseBook;

impl PhraseBook {
    pub fn new() -> Self {
        Self
    }

    /// A phrase for `label`: from its dedicated set when the lower-cased
    /// label is in the table, otherwise from a generic template with the
    /// label substituted in. Either way the pick is uniform.
    pub fn phrase_for(&self, label: &str) -> String {
        let mut rng = rand::thread_rng();

        if let Some(set) = Self::known_set(label) {
            // Non-empty by construction.
            return (*set.choose(&mut rng).unwrap()).to_string();
        }

        let template = GENERIC_TEMPLATES.choose(&mut rng).unwrap();
        template.replace("{}", label)
    }

    /// The dedicated phrase set for `label`, if it has one.
    pub fn known_set(label: &str) -> Option<&'static [&'static str]> {
        let needle = label.to_lowercase();
        PHRASE_SETS
            .iter()
            .find(|(key, _)| *key == needle)
            .map(|(_, set)| *set)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
