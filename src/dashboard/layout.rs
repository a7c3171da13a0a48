// Grid placement and id assignment.
//
// Panels flow left to right and wrap once the 24 column grid is full; the
// next line starts below the tallest panel of the previous one. Rows span the
// whole width with a zero height; a collapsed row takes one grid line. Ids
// follow traversal order from 1.

use crate::model::{AlertGroup, GridPos, Panel, PanelKind};
use crate::panel::PanelDraft;
use crate::row::RowDraft;

pub const GRID_WIDTH: u32 = 24;

/// Panels ready for the board, and the alerts of the panels that carry one
/// along with the id of their panel.
#[derive(Debug, Default)]
pub(crate) struct Layout {
    pub(crate) panels: Vec<Panel>,
    pub(crate) alerts: Vec<(u32, AlertGroup)>,
}

pub(crate) fn layout(rows: Vec<RowDraft>) -> Layout {
    let mut out = Layout::default();
    let mut next_id = 1;
    let mut y = 0;

    for draft in rows {
        let collapsed = draft.is_collapsed();

        let mut row = draft.row;
        row.id = next_id;
        next_id += 1;
        row.grid_pos = GridPos {
            x: 0,
            y,
            w: GRID_WIDTH,
            h: 0,
        };

        let mut cursor = Cursor::new(y);
        let mut children = Vec::with_capacity(draft.panels.len());
        for PanelDraft { mut panel, alert } in draft.panels {
            panel.id = next_id;
            next_id += 1;
            cursor.place(&mut panel.grid_pos);
            if let Some(alert) = alert {
                out.alerts.push((panel.id, alert));
            }
            children.push(panel);
        }

        if collapsed {
            if let PanelKind::Row(inner) = &mut row.kind {
                inner.panels = children;
            }
            out.panels.push(row);
            y += 1;
        } else {
            y = cursor.bottom();
            out.panels.push(row);
            out.panels.extend(children);
        }
    }

    out
}

struct Cursor {
    x: u32,
    y: u32,
    line_height: u32,
}

impl Cursor {
    fn new(y: u32) -> Self {
        Self {
            x: 0,
            y,
            line_height: 0,
        }
    }

    fn place(&mut self, pos: &mut GridPos) {
        pos.w = pos.w.min(GRID_WIDTH);
        if self.x + pos.w > GRID_WIDTH {
            self.x = 0;
            self.y += self.line_height;
            self.line_height = 0;
        }
        pos.x = self.x;
        pos.y = self.y;
        self.x += pos.w;
        self.line_height = self.line_height.max(pos.h);
    }

    fn bottom(&self) -> u32 {
        self.y + self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{CommonOptions, Text};
    use crate::row::Row;

    fn positions(layout: &Layout) -> Vec<(u32, u32, u32, u32, u32)> {
        layout
            .panels
            .iter()
            .map(|p| (p.id, p.grid_pos.x, p.grid_pos.y, p.grid_pos.w, p.grid_pos.h))
            .collect()
    }

    #[test]
    fn test_panels_wrap_below_tallest() {
        let row = Row::new("r")
            .with_panel(Text::new("a").span(6.0))
            .with_panel(Text::new("b").span(4.0).height("400px"))
            .with_panel(Text::new("c").span(4.0))
            .with_panel(Text::new("d").span(6.0))
            .build()
            .unwrap();

        let layout = layout(vec![row]);
        assert_eq!(
            positions(&layout),
            vec![
                (1, 0, 0, 24, 0),
                (2, 0, 0, 12, 8),
                (3, 12, 0, 8, 13),
                (4, 0, 13, 8, 8),
                (5, 8, 13, 12, 8),
            ]
        );
    }

    #[test]
    fn test_rows_stack() {
        let first = Row::new("one")
            .with_panel(Text::new("a"))
            .build()
            .unwrap();
        let second = Row::new("two")
            .with_panel(Text::new("b"))
            .build()
            .unwrap();

        let layout = layout(vec![first, second]);
        assert_eq!(
            positions(&layout),
            vec![
                (1, 0, 0, 24, 0),
                (2, 0, 0, 12, 8),
                (3, 0, 8, 24, 0),
                (4, 0, 8, 12, 8),
            ]
        );
    }

    #[test]
    fn test_collapsed_row_keeps_children() {
        let collapsed = Row::new("hidden")
            .collapse()
            .with_panel(Text::new("a"))
            .build()
            .unwrap();
        let open = Row::new("open").build().unwrap();

        let layout = layout(vec![collapsed, open]);
        assert_eq!(layout.panels.len(), 2);
        match &layout.panels[0].kind {
            PanelKind::Row(row) => {
                assert_eq!(row.panels.len(), 1);
                assert_eq!(row.panels[0].id, 2);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
        assert_eq!(layout.panels[0].grid_pos.y, 0);
        assert_eq!(layout.panels[1].id, 3);
        assert_eq!(layout.panels[1].grid_pos.y, 1);
    }
}
