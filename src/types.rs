//! Core types shared across the landing-page state layer.
//!
//! - [`ElementId`] - opaque handle for a rendered node
//! - [`Icon`] - closed set of glyphs with a fallback on lookup
//! - [`Section`] / [`SectionSet`] - landing sections and their reveal keys
//! - [`CarouselItem`] - hero carousel card content

use bitflags::bitflags;

use crate::state::RevealOptions;

// =============================================================================
// ELEMENT HANDLE
// =============================================================================

/// Handle to a concrete rendered node supplied by the render layer.
///
/// The state layer never inspects it; intersection sources use it to find
/// the node's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl From<usize> for ElementId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

// =============================================================================
// ICONS
// =============================================================================

/// Glyphs used across the landing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Icon {
    Activity,
    Apple,
    Book,
    BookOpen,
    ChevronDown,
    Dna,
    Droplets,
    FileText,
    FlaskConical,
    Globe,
    HeartPulse,
    MessageCircle,
    Radar,
    RefreshCw,
    Scale,
    Search,
    Share,
    Sparkles,
    Star,
    Stethoscope,
    SunMedium,
    Syringe,
    Target,
    UserRoundCheck,
    Waveform,
    XBrand,
}

impl Icon {
    /// Every icon, in declaration order.
    pub const ALL: [Icon; 26] = [
        Icon::Activity,
        Icon::Apple,
        Icon::Book,
        Icon::BookOpen,
        Icon::ChevronDown,
        Icon::Dna,
        Icon::Droplets,
        Icon::FileText,
        Icon::FlaskConical,
        Icon::Globe,
        Icon::HeartPulse,
        Icon::MessageCircle,
        Icon::Radar,
        Icon::RefreshCw,
        Icon::Scale,
        Icon::Search,
        Icon::Share,
        Icon::Sparkles,
        Icon::Star,
        Icon::Stethoscope,
        Icon::SunMedium,
        Icon::Syringe,
        Icon::Target,
        Icon::UserRoundCheck,
        Icon::Waveform,
        Icon::XBrand,
    ];

    /// Default glyph for unknown names.
    pub const FALLBACK: Icon = Icon::Sparkles;

    /// Content-config name of this icon.
    pub fn name(self) -> &'static str {
        match self {
            Icon::Activity => "Activity",
            Icon::Apple => "Apple",
            Icon::Book => "Book",
            Icon::BookOpen => "BookOpen",
            Icon::ChevronDown => "ChevronDown",
            Icon::Dna => "Dna",
            Icon::Droplets => "Droplets",
            Icon::FileText => "FileText",
            Icon::FlaskConical => "FlaskConical",
            Icon::Globe => "Globe",
            Icon::HeartPulse => "HeartPulse",
            Icon::MessageCircle => "MessageCircle",
            Icon::Radar => "Radar",
            Icon::RefreshCw => "RefreshCw",
            Icon::Scale => "Scale",
            Icon::Search => "Search",
            Icon::Share => "Share2",
            Icon::Sparkles => "Sparkles",
            Icon::Star => "Star",
            Icon::Stethoscope => "Stethoscope",
            Icon::SunMedium => "SunMedium",
            Icon::Syringe => "Syringe",
            Icon::Target => "Target",
            Icon::UserRoundCheck => "UserRoundCheck",
            Icon::Waveform => "Waveform",
            Icon::XBrand => "XBrand",
        }
    }

    /// Exact lookup by content-config name.
    pub fn parse(name: &str) -> Option<Icon> {
        Icon::ALL.iter().copied().find(|icon| icon.name() == name)
    }

    /// Lookup with the default fallback (`Sparkles`).
    pub fn from_name(name: &str) -> Icon {
        Icon::resolve_or(name, Icon::FALLBACK)
    }

    /// Lookup with a caller-chosen fallback.
    ///
    /// The footer falls back to `Share`, the content map to `Target`.
    pub fn resolve_or(name: &str, fallback: Icon) -> Icon {
        Icon::parse(name).unwrap_or(fallback)
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Landing page sections, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    ContentMap,
    FeaturedInterventions,
    HowItWorks,
    Methodology,
    Audience,
    Cta,
    Footer,
}

impl Section {
    /// Page order.
    pub const ALL: [Section; 8] = [
        Section::Hero,
        Section::ContentMap,
        Section::FeaturedInterventions,
        Section::HowItWorks,
        Section::Methodology,
        Section::Audience,
        Section::Cta,
        Section::Footer,
    ];

    /// Reveal key of the section's leading element.
    pub fn key(self) -> &'static str {
        match self {
            Section::Hero => "hero-intro",
            Section::ContentMap => "content-map-heading",
            Section::FeaturedInterventions => "interventions-heading",
            Section::HowItWorks => "how-it-works-heading",
            Section::Methodology => "methodology-heading",
            Section::Audience => "audience-heading",
            Section::Cta => "cta-panel",
            Section::Footer => "footer",
        }
    }

    /// Section owning a reveal key.
    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL.iter().copied().find(|section| section.key() == key)
    }

    /// Reveal tuning for the section's leading element.
    pub fn reveal_options(self) -> RevealOptions {
        let threshold = match self {
            Section::Hero => 0.55,
            Section::ContentMap | Section::HowItWorks => 0.35,
            Section::FeaturedInterventions | Section::Methodology | Section::Audience => 0.3,
            Section::Cta => 0.4,
            Section::Footer => 0.25,
        };
        RevealOptions::default()
            .threshold(threshold)
            .root_margin("-10% 0px")
    }

    /// Flag for this section in a [`SectionSet`].
    pub fn flag(self) -> SectionSet {
        match self {
            Section::Hero => SectionSet::HERO,
            Section::ContentMap => SectionSet::CONTENT_MAP,
            Section::FeaturedInterventions => SectionSet::FEATURED_INTERVENTIONS,
            Section::HowItWorks => SectionSet::HOW_IT_WORKS,
            Section::Methodology => SectionSet::METHODOLOGY,
            Section::Audience => SectionSet::AUDIENCE,
            Section::Cta => SectionSet::CTA,
            Section::Footer => SectionSet::FOOTER,
        }
    }
}

bitflags! {
    /// Set of landing sections, e.g. the ones already revealed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SectionSet: u8 {
        const HERO = 1 << 0;
        const CONTENT_MAP = 1 << 1;
        const FEATURED_INTERVENTIONS = 1 << 2;
        const HOW_IT_WORKS = 1 << 3;
        const METHODOLOGY = 1 << 4;
        const AUDIENCE = 1 << 5;
        const CTA = 1 << 6;
        const FOOTER = 1 << 7;
    }
}

impl SectionSet {
    /// Sections in the set, in page order.
    pub fn sections(self) -> Vec<Section> {
        Section::ALL
            .iter()
            .copied()
            .filter(|section| self.contains(section.flag()))
            .collect()
    }
}

// =============================================================================
// CAROUSEL
// =============================================================================

/// One hero carousel card. Opaque to the rotator.
#[derive(Clone, Debug, PartialEq)]
pub struct CarouselItem {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub label: &'static str,
    pub value: &'static str,
    pub icon: Icon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_lookup() {
        assert_eq!(Icon::from_name("Syringe"), Icon::Syringe);
        assert_eq!(Icon::from_name("Share2"), Icon::Share);
        assert_eq!(Icon::parse("Nope"), None);
    }

    #[test]
    fn test_icon_fallbacks() {
        assert_eq!(Icon::from_name("DoesNotExist"), Icon::Sparkles);
        assert_eq!(Icon::from_name(""), Icon::Sparkles);
        assert_eq!(Icon::resolve_or("DoesNotExist", Icon::Share), Icon::Share);
        assert_eq!(Icon::resolve_or("Dna", Icon::Target), Icon::Dna);
    }

    #[test]
    fn test_icon_names_round_trip() {
        for icon in Icon::ALL {
            assert_eq!(Icon::parse(icon.name()), Some(icon));
        }
    }

    #[test]
    fn test_section_keys_unique() {
        for section in Section::ALL {
            assert_eq!(Section::from_key(section.key()), Some(section));
        }
        assert_eq!(Section::from_key("hero-badge"), None);
    }

    #[test]
    fn test_section_reveal_options() {
        let hero = Section::Hero.reveal_options();
        assert!((hero.threshold - 0.55).abs() < f32::EPSILON);
        assert_eq!(hero.root_margin, "-10% 0px");
        assert!(hero.once);

        assert!((Section::Footer.reveal_options().threshold - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_section_set_order() {
        let set = SectionSet::FOOTER | SectionSet::HERO | SectionSet::CTA;
        assert_eq!(set.sections(), vec![Section::Hero, Section::Cta, Section::Footer]);
        assert!(SectionSet::empty().sections().is_empty());
    }
}
