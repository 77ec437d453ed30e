//! Page Layout - Section geometry via Taffy
//!
//! Lays the landing sections out as a single flex column at a given
//! viewport width and extracts one rectangle per section. The rectangles
//! are in page coordinates (y grows downward from the top of the page),
//! ready to hand to a geometric intersection source.

use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display, FlexDirection, LengthPercentage,
    NodeId, Size, Style, TaffyResult, TaffyTree,
};

use crate::types::Section;

// =============================================================================
// GEOMETRY
// =============================================================================

/// Axis-aligned rectangle in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Area, zero for degenerate rectangles.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap with another rectangle, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);

        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Same rectangle shifted by (dx, dy).
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

// =============================================================================
// PAGE LAYOUT
// =============================================================================

/// One section's intrinsic height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBlock {
    pub section: Section,
    pub height: f32,
}

impl SectionBlock {
    /// Create a block.
    pub fn new(section: Section, height: f32) -> Self {
        Self { section, height }
    }
}

/// Computed section rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLayout {
    pub sections: Vec<(Section, Rect)>,
    pub content_height: f32,
}

impl PageLayout {
    /// Lay out `blocks` top to bottom in a column `width` wide with `gap`
    /// between sections.
    pub fn compute(width: f32, gap: f32, blocks: &[SectionBlock]) -> TaffyResult<PageLayout> {
        let mut tree: TaffyTree<()> = TaffyTree::new();

        let mut children: Vec<NodeId> = Vec::with_capacity(blocks.len());
        for block in blocks {
            let style = Style {
                size: Size {
                    width: TaffyDimension::Percent(1.0),
                    height: TaffyDimension::Length(block.height.max(0.0)),
                },
                flex_shrink: 0.0,
                ..Style::default()
            };
            children.push(tree.new_leaf(style)?);
        }

        let root_style = Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            size: Size {
                width: TaffyDimension::Length(width),
                height: TaffyDimension::Auto,
            },
            gap: Size {
                width: LengthPercentage::Length(0.0),
                height: LengthPercentage::Length(gap.max(0.0)),
            },
            ..Style::default()
        };
        let root = tree.new_with_children(root_style, &children)?;

        let available = Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::MaxContent,
        };
        tree.compute_layout(root, available)?;

        let mut sections = Vec::with_capacity(blocks.len());
        for (block, &node) in blocks.iter().zip(children.iter()) {
            let layout = tree.layout(node)?;
            sections.push((
                block.section,
                Rect::new(
                    layout.location.x,
                    layout.location.y,
                    layout.size.width,
                    layout.size.height,
                ),
            ));
        }

        let content_height = tree.layout(root)?.size.height;
        Ok(PageLayout { sections, content_height })
    }

    /// Rectangle of a section, if it was laid out.
    pub fn rect(&self, section: Section) -> Option<Rect> {
        self.sections
            .iter()
            .find(|(candidate, _)| *candidate == section)
            .map(|(_, rect)| *rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);

        let overlap = a.intersection(&b).unwrap();
        assert_eq!(overlap, Rect::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(overlap.area(), 25.0);

        let far = Rect::new(20.0, 20.0, 1.0, 1.0);
        assert!(a.intersection(&far).is_none());

        // Touching edges do not overlap
        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.intersection(&touching).is_none());
    }

    #[test]
    fn test_compute_empty() {
        let layout = PageLayout::compute(800.0, 0.0, &[]).unwrap();
        assert!(layout.sections.is_empty());
        assert!(approx(layout.content_height, 0.0));
    }

    #[test]
    fn test_compute_stacks_sections() {
        let blocks = [
            SectionBlock::new(Section::Hero, 600.0),
            SectionBlock::new(Section::ContentMap, 400.0),
            SectionBlock::new(Section::Footer, 200.0),
        ];
        let layout = PageLayout::compute(1000.0, 20.0, &blocks).unwrap();

        let hero = layout.rect(Section::Hero).unwrap();
        let map = layout.rect(Section::ContentMap).unwrap();
        let footer = layout.rect(Section::Footer).unwrap();

        assert!(approx(hero.y, 0.0));
        assert!(approx(hero.width, 1000.0));
        assert!(approx(hero.height, 600.0));
        assert!(approx(map.y, 620.0));
        assert!(approx(footer.y, 1040.0));
        assert!(approx(layout.content_height, 1240.0));
        assert!(layout.rect(Section::Cta).is_none());
    }
}
