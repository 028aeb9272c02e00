use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: drill area + review sidebar, progress bar
    Medium, // 60-99 cols: full-width drill, review strip above it
    Narrow, // <60 cols: full-width drill, review count in the header only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_progress_bar(&self, height: u16) -> bool {
        height >= 20 && *self != LayoutTier::Narrow
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }

    pub fn show_review_strip(&self) -> bool {
        *self == LayoutTier::Medium
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub review_strip: Option<Rect>,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub progress: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect, has_reviews: bool) -> Self {
        let tier = LayoutTier::from_area(area);
        let strip_height = if has_reviews && tier.show_review_strip() { 3 } else { 0 };
        let progress_height = if tier.show_progress_bar(area.height) { 3 } else { 0 };

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(strip_height),
                Constraint::Min(10),
                Constraint::Length(progress_height),
                Constraint::Length(1),
            ])
            .split(area);

        let review_strip = (strip_height > 0).then_some(vertical[1]);
        let progress = (progress_height > 0).then_some(vertical[3]);

        if tier.show_sidebar() && has_reviews {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(vertical[2]);

            Self {
                header: vertical[0],
                review_strip,
                main: horizontal[0],
                sidebar: Some(horizontal[1]),
                progress,
                footer: vertical[4],
                tier,
            }
        } else {
            Self {
                header: vertical[0],
                review_strip,
                main: vertical[2],
                sidebar: None,
                progress,
                footer: vertical[4],
                tier,
            }
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 7;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_layout_has_sidebar_only_with_reviews() {
        let area = Rect::new(0, 0, 120, 40);
        assert!(AppLayout::new(area, true).sidebar.is_some());
        assert!(AppLayout::new(area, false).sidebar.is_none());
        assert!(AppLayout::new(area, true).progress.is_some());
    }

    #[test]
    fn test_medium_layout_uses_strip() {
        let area = Rect::new(0, 0, 80, 30);
        let layout = AppLayout::new(area, true);
        assert_eq!(layout.tier, LayoutTier::Medium);
        assert!(layout.sidebar.is_none());
        assert_eq!(layout.review_strip.map(|r| r.height), Some(3));
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[Enter] Check", "[Ctrl+S] Listen", "[Esc] Quit"], 32);
        assert_eq!(lines, vec![" [Enter] Check  [Ctrl+S] Listen", " [Esc] Quit"]);
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 30, 5);
        let popup = centered_rect(50, 50, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }
}
