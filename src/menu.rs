//! Declarative menus loaded from YAML
//!
//! ```yaml
//! title: Shop
//! rows: 3
//! cancel_clicks: true
//! panes:
//!   - id: border
//!     pattern: ["#########", "#       #", "#########"]
//!     items:
//!       "#": { material: gray_stained_glass_pane, name: " " }
//!   - id: goods
//!     pages:
//!       - pattern: ["", " a "]
//!         items:
//!           a: { material: apple, action: { notify: "Bought an apple" } }
//!   - id: controls
//!     pagination:
//!       target: goods
//!       back: { column: 0, row: 2, name: Back }
//!       next: { column: 8, row: 2, name: Next }
//! ```
//!
//! Actions are written as single-entry maps (`{ notify: "..." }`), except
//! `close`, which is a bare string.

use crate::error::{FrameworkError, FrameworkResult};
use crate::model::{
    ChestLayout, Command, InventoryItem, ItemBuilder, Material, PaginationItem, Pane, PaneId,
    PaneItems, Pattern,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    Close,
    NextPage(String),
    PreviousPage(String),
    ShowPane(String),
    HidePane(String),
    TogglePane(String),
    Notify(String),
}

impl ItemAction {
    fn command(&self) -> Command {
        match self {
            ItemAction::Close => Command::Close,
            ItemAction::NextPage(p) => Command::NextPage(PaneId::new(p.as_str())),
            ItemAction::PreviousPage(p) => Command::PreviousPage(PaneId::new(p.as_str())),
            ItemAction::ShowPane(p) => Command::ShowPane(PaneId::new(p.as_str())),
            ItemAction::HidePane(p) => Command::HidePane(PaneId::new(p.as_str())),
            ItemAction::TogglePane(p) => Command::TogglePane(PaneId::new(p.as_str())),
            ItemAction::Notify(msg) => Command::Notify(msg.clone()),
        }
    }

    /// Pane this action refers to, if any
    fn target(&self) -> Option<&str> {
        match self {
            ItemAction::NextPage(p)
            | ItemAction::PreviousPage(p)
            | ItemAction::ShowPane(p)
            | ItemAction::HidePane(p)
            | ItemAction::TogglePane(p) => Some(p),
            ItemAction::Close | ItemAction::Notify(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDefinition {
    pub material: String,
    #[serde(default)]
    pub amount: Option<u8>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
    #[serde(default)]
    pub glow: bool,
    /// Skin hash for player heads
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub action: Option<ItemAction>,
}

impl ItemDefinition {
    fn build(&self) -> FrameworkResult<InventoryItem> {
        let mut builder =
            ItemBuilder::new(Material::parse(&self.material)?).lore_lines(self.lore.iter().cloned());
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(amount) = self.amount {
            builder = builder.amount(amount);
        }
        if self.glow {
            builder = builder.glow();
        }
        if let Some(texture) = &self.texture {
            builder = builder.custom_texture(texture);
        }

        let stack = builder.build()?;
        Ok(match &self.action {
            Some(action) => InventoryItem::emitting(stack, action.command()),
            None => InventoryItem::new(stack),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageDefinition {
    #[serde(default)]
    pub pattern: Vec<String>,
    #[serde(default)]
    pub items: BTreeMap<String, ItemDefinition>,
}

impl PageDefinition {
    fn build(&self) -> FrameworkResult<PaneItems> {
        let pattern = Pattern::new(&self.pattern)?;
        let mut map = HashMap::new();
        for (key, definition) in &self.items {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(FrameworkError::menu(format!(
                    "item key {:?} must be a single character",
                    key
                )));
            };
            map.insert(c, definition.build()?);
        }

        let mut items = PaneItems::new();
        items.create_pattern(&map, &pattern);
        Ok(items)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButtonDefinition {
    pub column: usize,
    pub row: usize,
    pub name: String,
}

impl From<&ButtonDefinition> for PaginationItem {
    fn from(button: &ButtonDefinition) -> Self {
        PaginationItem::new(button.column, button.row, button.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationDefinition {
    pub target: String,
    #[serde(default)]
    pub back: Option<ButtonDefinition>,
    #[serde(default)]
    pub next: Option<ButtonDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaneDefinition {
    pub id: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub pattern: Vec<String>,
    #[serde(default)]
    pub items: BTreeMap<String, ItemDefinition>,
    /// Present for paginated panes
    #[serde(default)]
    pub pages: Vec<PageDefinition>,
    #[serde(default)]
    pub pagination: Option<PaginationDefinition>,
}

fn default_visible() -> bool {
    true
}

impl PaneDefinition {
    fn build(&self) -> FrameworkResult<Pane> {
        let mut pane = if self.pages.is_empty() {
            let mut pane = Pane::new(self.id.as_str());
            let page = PageDefinition {
                pattern: self.pattern.clone(),
                items: self.items.clone(),
            }
            .build()?;
            for (pos, item) in page.iter() {
                pane.add_item(pos, item.clone());
            }
            pane
        } else {
            if !self.pattern.is_empty() || !self.items.is_empty() || self.pagination.is_some() {
                return Err(FrameworkError::menu(format!(
                    "pane {} has pages; pattern, items and pagination belong in a static pane",
                    self.id
                )));
            }
            let mut pane = Pane::paginated(self.id.as_str());
            for page in &self.pages {
                pane.add_page(page.build()?)?;
            }
            pane
        };

        if let Some(pagination) = &self.pagination {
            pane.add_pagination_items(
                pagination.back.as_ref().map(PaginationItem::from).as_ref(),
                pagination.next.as_ref().map(PaginationItem::from).as_ref(),
                &PaneId::new(pagination.target.as_str()),
            )?;
        }

        pane.set_visible(self.visible);
        Ok(pane)
    }

    fn referenced_panes(&self) -> impl Iterator<Item = &str> {
        let items = self
            .items
            .values()
            .chain(self.pages.iter().flat_map(|p| p.items.values()));
        items
            .filter_map(|i| i.action.as_ref().and_then(ItemAction::target))
            .chain(self.pagination.as_ref().map(|p| p.target.as_str()))
    }
}

/// A whole menu as written in a YAML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuDefinition {
    pub title: String,
    pub rows: usize,
    #[serde(default)]
    pub cancel_clicks: bool,
    #[serde(default)]
    pub panes: Vec<PaneDefinition>,
}

impl MenuDefinition {
    pub fn from_yaml(source: &str) -> FrameworkResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load(path: &Path) -> FrameworkResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Compile into a layout, checking that every action names a real pane
    pub fn build(&self) -> FrameworkResult<ChestLayout> {
        for pane in &self.panes {
            for target in pane.referenced_panes() {
                if !self.panes.iter().any(|p| p.id == target) {
                    return Err(FrameworkError::menu(format!(
                        "pane {} refers to unknown pane {}",
                        pane.id, target
                    )));
                }
            }
        }

        let mut layout =
            ChestLayout::new(self.rows, self.title.clone())?.cancel_clicks(self.cancel_clicks);
        for pane in &self.panes {
            layout.add_pane(pane.build()?)?;
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::SlotPos;

    const DEMO: &str = include_str!("../menus/demo.yaml");

    const SHOP: &str = r#"
title: Shop
rows: 3
cancel_clicks: true
panes:
  - id: border
    pattern:
      - "+++++++++"
      - "+       +"
      - "+++++++++"
    items:
      "+": { material: gray_stained_glass_pane, name: " " }
  - id: goods
    pages:
      - pattern: ["", "  a   b"]
        items:
          a: { material: apple, name: Apple, action: { notify: "Bought an apple" } }
          b: { material: bread, amount: 3 }
      - pattern: ["", "  c"]
        items:
          c: { material: cake, glow: true }
  - id: controls
    pagination:
      target: goods
      back: { column: 0, row: 2, name: Back }
      next: { column: 8, row: 2, name: Next }
    items:
      x: { material: barrier, action: close }
    pattern: ["", "", "    x"]
"#;

    #[test]
    fn test_shop_menu_builds() {
        let layout = MenuDefinition::from_yaml(SHOP).unwrap().build().unwrap();
        assert_eq!(layout.title(), "Shop");
        assert!(layout.cancels_clicks());
        assert_eq!(layout.panes().len(), 3);

        let grid = layout.render();
        assert_eq!(grid.get(11).unwrap().material.path(), "apple");
        assert_eq!(grid.get(15).unwrap().amount, 3);
        assert_eq!(grid.get(18).unwrap().name.as_deref(), Some("Back"));
        assert_eq!(grid.get(22).unwrap().material.path(), "barrier");
        assert!(grid.get(0).is_some());
    }

    #[test]
    fn test_actions_compile_to_commands() {
        let mut layout = MenuDefinition::from_yaml(SHOP).unwrap().build().unwrap();
        let next = layout
            .items_at(SlotPos::new(8, 2).index())
            .last()
            .unwrap()
            .on_click
            .is_some();
        assert!(next);

        layout.apply(&Command::NextPage("goods".into())).unwrap();
        assert!(layout.render().get(11).unwrap().glint);
    }

    #[test]
    fn test_action_forms() {
        let yaml = r#"
title: Actions
rows: 1
panes:
  - id: a
    pattern: ["xyz"]
    items:
      x: { material: stone, action: close }
      y: { material: stone, action: { notify: "hello" } }
      z: { material: stone, action: { toggle_pane: a } }
"#;
        let menu = MenuDefinition::from_yaml(yaml).unwrap();
        let items = &menu.panes[0].items;
        assert_eq!(items["x"].action, Some(ItemAction::Close));
        assert_eq!(items["y"].action, Some(ItemAction::Notify("hello".into())));
        assert_eq!(items["z"].action, Some(ItemAction::TogglePane("a".into())));
        assert!(menu.build().is_ok());
    }

    #[test]
    fn test_demo_menu_builds() {
        let menu = MenuDefinition::from_yaml(DEMO).unwrap();
        let layout = menu.build().unwrap();
        assert_eq!(layout.title(), "Village Market");
        assert_eq!(layout.rows().get(), 5);
        assert_eq!(layout.panes().len(), 4);

        let grid = layout.render();
        assert_eq!(grid.get(10).unwrap().material.path(), "apple");
        assert!(grid.get(36).unwrap().material.is_player_head());
        assert_eq!(grid.get(41).unwrap().material.path(), "barrier");
        assert_eq!(grid.get(39).unwrap().material.path(), "book");
        assert!(grid.get(20).is_none());

        let details = layout.pane(&"details".into()).unwrap();
        assert!(!details.is_visible());
        assert_eq!(layout.pane(&"goods".into()).unwrap().page_count(), 3);
    }

    #[test]
    fn test_button_outside_grid_rejected() {
        let yaml = r#"
title: Broken
rows: 2
panes:
  - id: goods
    pages:
      - pattern: ["a"]
        items:
          a: { material: stone }
  - id: controls
    pagination:
      target: goods
      back: { column: 0, row: 2049638230412172402, name: Back }
"#;
        let err = MenuDefinition::from_yaml(yaml).unwrap().build().unwrap_err();
        assert!(matches!(err, FrameworkError::SlotOutOfBounds { rows: 2, .. }));

        let wide = yaml.replace("column: 0, row: 2049638230412172402", "column: 9, row: 0");
        let err = MenuDefinition::from_yaml(&wide).unwrap().build().unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::SlotOutOfBounds { column: 9, row: 0, rows: 2 }
        ));
    }

    #[test]
    fn test_unknown_target_rejected() {
        let yaml = r#"
title: Broken
rows: 1
panes:
  - id: a
    pattern: ["x"]
    items:
      x: { material: stone, action: { hide_pane: nowhere } }
"#;
        let err = MenuDefinition::from_yaml(yaml).unwrap().build().unwrap_err();
        assert!(matches!(err, FrameworkError::Menu(_)));
    }

    #[test]
    fn test_multi_char_key_rejected() {
        let yaml = r#"
title: Broken
rows: 1
panes:
  - id: a
    pattern: ["xx"]
    items:
      xx: { material: stone }
"#;
        assert!(MenuDefinition::from_yaml(yaml).unwrap().build().is_err());
    }

    #[test]
    fn test_bad_rows_and_unknown_fields() {
        assert!(MenuDefinition::from_yaml("title: t\nrows: 9\n")
            .unwrap()
            .build()
            .is_err());
        assert!(MenuDefinition::from_yaml("title: t\nrows: 1\ncolour: red\n").is_err());
    }

    #[test]
    fn test_hidden_pane() {
        let yaml = r#"
title: Hidden
rows: 1
panes:
  - id: a
    visible: false
    pattern: ["x"]
    items:
      x: { material: stone }
"#;
        let layout = MenuDefinition::from_yaml(yaml).unwrap().build().unwrap();
        assert_eq!(layout.render().occupied(), 0);
    }
}
