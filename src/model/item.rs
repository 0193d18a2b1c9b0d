//! Item stacks and the fluent item builder

use crate::error::{FrameworkError, FrameworkResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

/// Namespaced material ids, e.g. `minecraft:stone` or just `stone`
static MATERIAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9_.-]+:)?[a-z0-9_./-]+$").expect("material pattern compiles")
});

/// Texture hashes as served by the skin CDN
static TEXTURE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{32,64}$").expect("texture pattern compiles"));

const DEFAULT_NAMESPACE: &str = "minecraft";
const TEXTURE_URL_BASE: &str = "http://textures.minecraft.net/texture/";

/// Tooltip component hidden on heads so the owner name does not leak
pub const PROFILE_COMPONENT: &str = "minecraft:profile";

/// A validated, namespaced material id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Material(String);

impl Material {
    /// Parse a material id, defaulting the namespace to `minecraft`
    pub fn parse(id: &str) -> FrameworkResult<Self> {
        let id = id.trim();
        if !MATERIAL_REGEX.is_match(id) {
            return Err(FrameworkError::InvalidMaterial(id.to_string()));
        }
        if id.contains(':') {
            Ok(Self(id.to_string()))
        } else {
            Ok(Self(format!("{}:{}", DEFAULT_NAMESPACE, id)))
        }
    }

    pub fn player_head() -> Self {
        Self(format!("{}:player_head", DEFAULT_NAMESPACE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id without the namespace prefix
    pub fn path(&self) -> &str {
        self.0.split_once(':').map(|(_, p)| p).unwrap_or(&self.0)
    }

    pub fn is_player_head(&self) -> bool {
        *self == Self::player_head()
    }
}

impl TryFrom<String> for Material {
    type Error = FrameworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Material::parse(&value)
    }
}

impl From<Material> for String {
    fn from(material: Material) -> Self {
        material.0
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Player profile attached to a head item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkullProfile {
    /// Head of an existing player
    Owner(Uuid),
    /// Custom skin; `value` is the base64 encoded textures property
    Texture { value: String },
}

impl SkullProfile {
    /// Build the textures property for a skin hash
    pub fn from_texture_hash(hash: &str) -> FrameworkResult<Self> {
        if !TEXTURE_REGEX.is_match(hash) {
            return Err(FrameworkError::InvalidTexture(hash.to_string()));
        }
        let property = serde_json::json!({
            "textures": { "SKIN": { "url": format!("{}{}", TEXTURE_URL_BASE, hash) } }
        });
        Ok(Self::Texture {
            value: STANDARD.encode(property.to_string()),
        })
    }
}

/// A displayable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
    /// Enchantment glint without listing enchantments
    #[serde(default)]
    pub glint: bool,
    #[serde(default)]
    pub profile: Option<SkullProfile>,
    #[serde(default)]
    pub hidden_components: BTreeSet<String>,
}

impl ItemStack {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            amount: 1,
            name: None,
            lore: Vec::new(),
            glint: false,
            profile: None,
            hidden_components: BTreeSet::new(),
        }
    }

    /// Custom name if set, otherwise the material path
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.material.path())
    }
}

/// Fluent builder for [`ItemStack`]
///
/// Validation failures are kept until [`ItemBuilder::build`] so chains
/// stay readable.
#[derive(Debug)]
pub struct ItemBuilder {
    stack: ItemStack,
    error: Option<FrameworkError>,
}

impl ItemBuilder {
    pub fn new(material: Material) -> Self {
        Self {
            stack: ItemStack::new(material),
            error: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.stack.name = Some(name.into());
        self
    }

    /// Replace the lore with a single line
    pub fn lore(mut self, line: impl Into<String>) -> Self {
        self.stack.lore = vec![line.into()];
        self
    }

    pub fn lore_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack.lore = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn amount(mut self, amount: u8) -> Self {
        self.stack.amount = amount.max(1);
        self
    }

    pub fn glow(mut self) -> Self {
        self.stack.glint = true;
        self
    }

    pub fn skull_owner(mut self, owner: Uuid) -> Self {
        self.stack.profile = Some(SkullProfile::Owner(owner));
        self
    }

    pub fn custom_texture(mut self, hash: &str) -> Self {
        match SkullProfile::from_texture_hash(hash) {
            Ok(profile) => self.stack.profile = Some(profile),
            Err(e) => self.fail(e),
        }
        self
    }

    fn fail(&mut self, error: FrameworkError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn build(self) -> FrameworkResult<ItemStack> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut stack = self.stack;
        if stack.profile.is_some() {
            if !stack.material.is_player_head() {
                return Err(FrameworkError::NotASkull(stack.material.to_string()));
            }
            stack.hidden_components.insert(PROFILE_COMPONENT.to_string());
        }
        Ok(stack)
    }
}
