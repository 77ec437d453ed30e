//! Static landing content consumed by the state layer.
//!
//! The rotator and content-map selector treat these as opaque display data;
//! they only care about ordering, count and ids.

use crate::types::{CarouselItem, Icon};

// =============================================================================
// HERO CAROUSEL
// =============================================================================

static HERO_CAROUSEL: [CarouselItem; 4] = [
    CarouselItem {
        id: "prp",
        title: "Platelet-rich plasma",
        subtitle: "Autologous platelet concentrates accelerating joint recovery",
        label: "Signal",
        value: "Emerging clinical consensus",
        icon: Icon::Syringe,
    },
    CarouselItem {
        id: "plasmapheresis",
        title: "Therapeutic plasma exchange",
        subtitle: "Extracorporeal swaps explored for rejuvenation markers",
        label: "Clarity",
        value: "Limited randomized data",
        icon: Icon::Droplets,
    },
    CarouselItem {
        id: "peptides",
        title: "Longevity peptide stacks",
        subtitle: "Targeted signaling modulators used in precision protocols",
        label: "Oversight",
        value: "Requires specialist guidance",
        icon: Icon::Activity,
    },
    CarouselItem {
        id: "hbot",
        title: "Hyperbaric oxygen therapy",
        subtitle: "Pressurized sessions tracking neuroplastic and recovery gains",
        label: "Momentum",
        value: "Strong niche studies",
        icon: Icon::Waveform,
    },
];

/// Default hero carousel cards, in display order.
pub fn hero_carousel_items() -> Vec<CarouselItem> {
    HERO_CAROUSEL.to_vec()
}

// =============================================================================
// CONTENT MAP
// =============================================================================

/// One intervention link inside a content-map category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentMapIntervention {
    pub id: &'static str,
    pub label: &'static str,
}

/// One tab of the content map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentMapCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: Icon,
    pub interventions: &'static [ContentMapIntervention],
}

const fn link(id: &'static str, label: &'static str) -> ContentMapIntervention {
    ContentMapIntervention { id, label }
}

// Grouping of the six featured interventions; labels are their display names
static CONTENT_MAP: [ContentMapCategory; 3] = [
    ContentMapCategory {
        id: "regenerative",
        name: "Regenerative therapies",
        icon: Icon::Syringe,
        interventions: &[
            link("prp", "Platelet-rich plasma"),
            link("plasmapheresis", "Plasmapheresis"),
        ],
    },
    ContentMapCategory {
        id: "molecular",
        name: "Molecular signaling",
        icon: Icon::Dna,
        interventions: &[
            link("peptides", "Longevity peptides"),
            link("tert", "TERT modulation"),
        ],
    },
    ContentMapCategory {
        id: "energetic",
        name: "Energy and oxygen",
        icon: Icon::SunMedium,
        interventions: &[
            link("redLight", "Red light therapy"),
            link("hbot", "Hyperbaric oxygen"),
        ],
    },
];

/// Default content-map categories, in tab order.
pub fn content_map_categories() -> Vec<ContentMapCategory> {
    CONTENT_MAP.to_vec()
}
