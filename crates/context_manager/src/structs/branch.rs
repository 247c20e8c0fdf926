use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAIN_BRANCH_NAME: &str = "main";

/// Display colors handed out to branches, in allocation order.
pub const BRANCH_COLORS: [&str; 8] = [
    "#3b82f6", // blue
    "#10b981", // green
    "#f59e0b", // yellow
    "#ef4444", // red
    "#8b5cf6", // purple
    "#ec4899", // pink
    "#06b6d4", // cyan
    "#f97316", // orange
];

/// A named continuation forked from a specific message.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub parent_branch_id: Option<Uuid>,
    /// The fork point. `None` marks the root branch.
    pub parent_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub color: String,
}

impl Branch {
    pub fn is_root(&self) -> bool {
        self.parent_message_id.is_none()
    }
}

/// First palette color no existing branch uses. Once the palette is exhausted
/// the color is reused by index: `BRANCH_COLORS[existing % len]`.
pub fn pick_branch_color<'a, I>(used: I, existing: usize) -> &'static str
where
    I: IntoIterator<Item = &'a str>,
{
    let used: Vec<&str> = used.into_iter().collect();
    BRANCH_COLORS
        .iter()
        .copied()
        .find(|color| !used.contains(color))
        .unwrap_or(BRANCH_COLORS[existing % BRANCH_COLORS.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_unused_color() {
        let used = [BRANCH_COLORS[0], BRANCH_COLORS[2]];
        assert_eq!(pick_branch_color(used, 2), BRANCH_COLORS[1]);
    }

    #[test]
    fn exhausted_palette_reuses_by_index() {
        assert_eq!(pick_branch_color(BRANCH_COLORS, 8), BRANCH_COLORS[0]);
        assert_eq!(pick_branch_color(BRANCH_COLORS, 11), BRANCH_COLORS[3]);
    }
}
