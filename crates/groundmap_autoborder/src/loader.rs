//! Catalog loading from a generic configuration tree.
//!
//! The tree mirrors the editor's data files: element name, string attributes
//! and ordered children. Three passes fill a [`RuleCatalog`]: item metadata,
//! border rule sets, then materials (brushes). Problems with single
//! directives become warnings in a [`LoadReport`] and the directive is
//! skipped; only an undefined replacement item aborts the whole load.

use crate::brush::{Brush, StackMaterial};
use crate::catalog::RuleCatalog;
use crate::error::LoadError;
use crate::rules::{
    BorderBlock, BorderRuleSet, BorderTarget, FriendRef, GroundMaterial, MatchPredicate,
    RuleSetRef, SpecificAction, SpecificCaseRule,
};
use groundmap_core::{Edge, ItemDatabase, ItemId, ItemType, MaterialId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

// ─── Config tree ─────────────────────────────────────────────────────────────

/// One element of the configuration tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Parse an attribute, `None` when missing or malformed
    pub fn attr_as<T: FromStr>(&self, key: &str) -> Option<T> {
        self.attr(key).and_then(|value| value.trim().parse().ok())
    }

    /// Boolean attribute: true when it starts with 1, t or y
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attr(key).map(|value| {
            matches!(
                value.trim_start().chars().next(),
                Some('1' | 't' | 'T' | 'y' | 'Y')
            )
        })
    }

    /// Children with the given element name (case-insensitive)
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> {
        self.children
            .iter()
            .filter(move |child| child.name.eq_ignore_ascii_case(name))
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// The three configuration trees a catalog is built from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub items: ConfigNode,
    pub borders: ConfigNode,
    pub materials: ConfigNode,
}

/// Non-fatal problems found while loading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

fn expect_root(node: &ConfigNode, expected: &str) -> Result<(), LoadError> {
    if node.is(expected) {
        Ok(())
    } else {
        Err(LoadError::InvalidRoot {
            expected: expected.to_string(),
            found: node.name.clone(),
        })
    }
}

// ─── Rule sets ───────────────────────────────────────────────────────────────

/// Read a rule set's pieces and tag its items in the database
///
/// `ground_link` is set for sets defined inline by a material: the pieces
/// then stand in for that ground item and belong to that material.
fn load_rule_set(
    node: &ConfigNode,
    id: u16,
    ground_link: Option<(ItemId, MaterialId)>,
    items: &mut ItemDatabase,
    report: &mut LoadReport,
) -> BorderRuleSet {
    let mut rule_set = BorderRuleSet::new(id);
    rule_set.ground = ground_link.is_some();
    rule_set.optional = node.attr("type") == Some("optional");
    rule_set.group = node.attr_as("group").unwrap_or(0);

    for child in &node.children {
        let Some(item_id) = child.attr("item") else {
            continue;
        };
        let Some(edge_name) = child.attr("edge") else {
            continue;
        };
        let item_id: ItemId = item_id.trim().parse().unwrap_or(0);
        let Some(item) = items.get_mut(item_id) else {
            report.warn(format!("Invalid item id {} for border {}", item_id, id));
            continue;
        };

        if let Some((equivalent, owner)) = ground_link {
            item.ground_equivalent = Some(equivalent);
            item.material = Some(owner);
        }
        item.always_on_bottom = true;
        item.is_border = true;
        item.is_optional_border |= rule_set.optional;
        if rule_set.group != 0 && item.border_group == 0 {
            item.border_group = rule_set.group;
        }

        if let Some(edge) = Edge::from_name(edge_name) {
            rule_set.set_piece(edge, item_id);
            if item.border_alignment.is_none() {
                item.border_alignment = Some(edge);
            }
        }
    }
    rule_set
}

impl RuleCatalog {
    /// Build a catalog from all three trees
    pub fn from_config(config: &CatalogConfig) -> Result<(Self, LoadReport), LoadError> {
        let mut catalog = RuleCatalog::new();
        let mut report = LoadReport::new();
        catalog.load_items(&config.items, &mut report)?;
        catalog.load_borders(&config.borders, &mut report)?;
        catalog.load_materials(&config.materials, &mut report)?;
        log::info!(
            "Loaded {} items, {} border rule sets, {} brushes ({} warnings)",
            catalog.items().len(),
            catalog.rule_sets().count(),
            catalog.brush_count(),
            report.warnings.len()
        );
        Ok((catalog, report))
    }

    /// Build a catalog from a JSON [`CatalogConfig`]
    pub fn from_json_str(json: &str) -> Result<(Self, LoadReport), LoadError> {
        let config: CatalogConfig =
            serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
        Self::from_config(&config)
    }

    /// Load a catalog from a JSON file
    pub fn load_file(path: &Path) -> Result<(Self, LoadReport), LoadError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LoadError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Load item metadata from an `items` tree
    pub fn load_items(&mut self, root: &ConfigNode, report: &mut LoadReport) -> Result<(), LoadError> {
        expect_root(root, "items")?;

        for node in root.children_named("item") {
            let ids: Vec<ItemId> = if let Some(id) = node.attr("id") {
                match id.trim().parse() {
                    Ok(id) => vec![id],
                    Err(_) => {
                        report.warn(format!("Invalid item id '{}'", id));
                        continue;
                    }
                }
            } else {
                match (node.attr_as::<ItemId>("fromid"), node.attr_as::<ItemId>("toid")) {
                    (Some(from), Some(to)) if from <= to => (from..=to).collect(),
                    _ => {
                        report.warn("Item node without a valid id or fromid/toid range");
                        continue;
                    }
                }
            };

            for id in ids {
                if id == 0 {
                    report.warn("Item id 0 is reserved");
                    continue;
                }
                let mut item = ItemType::new(id).with_name(node.attr("name").unwrap_or_default());
                match node.attr("type") {
                    Some("ground") => item.is_ground_tile = true,
                    Some("wall") => item.is_wall = true,
                    Some("carpet") => item.is_carpet = true,
                    Some("table") => item.is_table = true,
                    _ => {}
                }
                item.always_on_bottom = node.attr_bool("always_on_bottom").unwrap_or(false);
                item.top_order = node.attr_as("top_order").unwrap_or(0);
                self.items_mut().insert(item);
            }
        }
        Ok(())
    }

    /// Load standalone border rule sets from a `borders` tree
    pub fn load_borders(&mut self, root: &ConfigNode, report: &mut LoadReport) -> Result<(), LoadError> {
        expect_root(root, "borders")?;

        for node in root.children_named("border") {
            let id = match node.attr_as::<u16>("id") {
                Some(id) if id != 0 => id,
                _ => {
                    report.warn("Border node without a valid id");
                    continue;
                }
            };
            if self.rule_set_by_id(id).is_some() {
                report.warn(format!("Duplicate border id {}", id));
                continue;
            }
            let rule_set = load_rule_set(node, id, None, self.items_mut(), report);
            self.add_rule_set(rule_set);
        }
        Ok(())
    }

    /// Load brushes from a `materials` tree
    ///
    /// Names are registered before any brush body is read, so borders and
    /// friend lists may refer to materials defined further down.
    pub fn load_materials(&mut self, root: &ConfigNode, report: &mut LoadReport) -> Result<(), LoadError> {
        expect_root(root, "materials")?;

        let mut pending = Vec::new();
        for node in root.children_named("brush") {
            let Some(name) = node.attr("name").filter(|n| !n.is_empty()) else {
                report.warn("Brush node without a name");
                continue;
            };
            let kind = node.attr("type").unwrap_or_default();
            if !matches!(kind, "ground" | "wall" | "carpet" | "table") {
                report.warn(format!("Brush '{}' has unknown type '{}'", name, kind));
                continue;
            }
            let Some(id) = self.reserve_brush_name(name) else {
                report.warn(format!("Duplicate brush name '{}'", name));
                continue;
            };
            pending.push((node, name, kind, id));
        }

        for (node, name, kind, id) in pending {
            let brush = match kind {
                "ground" => self.load_ground(node, id, name, report)?.map(Brush::Ground),
                "wall" => Some(Brush::Wall(self.load_stack(node, id, name, report, |it| {
                    it.is_wall = true
                }))),
                "carpet" => Some(Brush::Carpet(self.load_stack(node, id, name, report, |it| {
                    it.is_carpet = true
                }))),
                _ => Some(Brush::Table(self.load_stack(node, id, name, report, |it| {
                    it.is_table = true
                }))),
            };
            match brush {
                Some(brush) => self.insert_brush(brush),
                None => self.release_brush_name(name),
            }
        }
        Ok(())
    }

    // ─── Ground materials ────────────────────────────────────────────────────

    /// Returns `Ok(None)` when the material is rejected
    fn load_ground(
        &mut self,
        node: &ConfigNode,
        id: MaterialId,
        name: &str,
        report: &mut LoadReport,
    ) -> Result<Option<GroundMaterial>, LoadError> {
        let mut ground = GroundMaterial::new(id, name);
        if let Some(look_id) = node.attr_as("lookid") {
            ground.look_id = look_id;
        }
        if let Some(look_id) = node.attr_as("server_lookid") {
            ground.look_id = look_id;
        }
        ground.z_order = node.attr_as("z-order").unwrap_or(0);
        ground.solo_optional = node.attr_bool("solo_optional").unwrap_or(false);
        ground.randomize = node.attr_bool("randomize").unwrap_or(true);

        // All ground items are checked before any of them is claimed
        let mut members = Vec::new();
        for child in node.children_named("item") {
            let item_id: ItemId = child.attr_as("id").unwrap_or(0);
            let chance = child.attr_as::<i64>("chance").unwrap_or(0).clamp(0, u32::MAX as i64) as u32;
            let problem = match self.items().get(item_id) {
                None => Some(format!("invalid item id {}", item_id)),
                Some(it) if !it.is_ground_tile => Some(format!("item {} is not a ground item", item_id)),
                Some(it) if it.material.map_or(false, |owner| owner != id) => {
                    Some(format!("item {} can not be member of two materials", item_id))
                }
                Some(_) => None,
            };
            if let Some(problem) = problem {
                report.warn(format!("Material '{}': {}", name, problem));
                return Ok(None);
            }
            members.push((item_id, chance));
        }
        for (item_id, chance) in members {
            if let Some(it) = self.items_mut().get_mut(item_id) {
                it.material = Some(id);
            }
            ground.add_item(item_id, chance);
        }

        for child in &node.children {
            match child.name.to_ascii_lowercase().as_str() {
                "optional" => self.load_optional(child, &mut ground, report),
                "border" => {
                    if let Some(block) = self.load_border_block(child, &ground, report)? {
                        ground.borders.push(block);
                    }
                }
                "friend" => self.load_friend(child, &mut ground, false, report),
                "enemy" => self.load_friend(child, &mut ground, true, report),
                "clear_borders" => ground.borders.clear(),
                "clear_friends" => {
                    ground.friends.clear();
                    ground.hate_friends = false;
                }
                _ => {}
            }
        }

        if ground.total_chance == 0 {
            ground.randomize = false;
        }
        Ok(Some(ground))
    }

    /// Problems with an inline ground equivalent, if any
    fn ground_equivalent_problem(&self, equivalent: ItemId, owner: MaterialId) -> Option<&'static str> {
        match self.items().get(equivalent) {
            None => Some("Invalid id of ground dependency equivalent item"),
            Some(it) if !it.is_ground_tile => Some("Ground dependency equivalent is not a ground item"),
            Some(it) if it.material.map_or(false, |m| m != owner) => {
                Some("Ground dependency equivalent does not use the same material as ground border")
            }
            Some(_) => None,
        }
    }

    fn add_ground_linked_rule_set(
        &mut self,
        node: &ConfigNode,
        equivalent: ItemId,
        owner: MaterialId,
        report: &mut LoadReport,
    ) -> RuleSetRef {
        let rule_set = load_rule_set(node, 0, Some((equivalent, owner)), self.items_mut(), report);
        self.add_rule_set(rule_set)
    }

    fn load_optional(&mut self, node: &ConfigNode, ground: &mut GroundMaterial, report: &mut LoadReport) {
        if ground.optional_border.is_some() {
            report.warn(format!("Material '{}': duplicate optional border", ground.name));
            return;
        }

        if let Some(equivalent) = node.attr("ground_equivalent") {
            let equivalent: ItemId = equivalent.trim().parse().unwrap_or(0);
            if let Some(problem) = self.ground_equivalent_problem(equivalent, ground.id) {
                report.warn(format!("Material '{}': {}", ground.name, problem));
                return;
            }
            ground.optional_border =
                Some(self.add_ground_linked_rule_set(node, equivalent, ground.id, report));
            return;
        }

        let Some(border_id) = node.attr_as::<u16>("id") else {
            report.warn(format!("Material '{}': optional border without an id", ground.name));
            return;
        };
        match self.rule_set_by_id(border_id) {
            Some(rule_set) => ground.optional_border = Some(rule_set),
            None => report.warn(format!("Could not find border id {}", border_id)),
        }
    }

    fn load_border_block(
        &mut self,
        node: &ConfigNode,
        ground: &GroundMaterial,
        report: &mut LoadReport,
    ) -> Result<Option<BorderBlock>, LoadError> {
        let rule_set = if let Some(raw) = node.attr("id") {
            match raw.trim().parse::<i64>().unwrap_or(0) {
                0 => None,
                border_id => {
                    let found = u16::try_from(border_id)
                        .ok()
                        .and_then(|border_id| self.rule_set_by_id(border_id));
                    match found {
                        Some(rule_set) => Some(rule_set),
                        None => {
                            report.warn(format!("Could not find border id {}", border_id));
                            return Ok(None);
                        }
                    }
                }
            }
        } else if let Some(equivalent) = node.attr("ground_equivalent") {
            let equivalent: ItemId = equivalent.trim().parse().unwrap_or(0);
            if let Some(problem) = self.ground_equivalent_problem(equivalent, ground.id) {
                report.warn(format!("Material '{}': {}", ground.name, problem));
            }
            Some(self.add_ground_linked_rule_set(node, equivalent, ground.id, report))
        } else {
            return Ok(None);
        };

        let to = match node.attr("to") {
            None | Some("all") => BorderTarget::All,
            Some("none") => BorderTarget::Nothing,
            Some(target) => match self.brush_id(target) {
                Some(id) => BorderTarget::Material(id),
                None => {
                    report.warn(format!("To brush '{}' doesn't exist", target));
                    return Ok(None);
                }
            },
        };
        let outer = node.attr("align") != Some("inner");

        let mut block = BorderBlock::new(rule_set, to, outer);
        block.is_super = node.attr_bool("super").unwrap_or(false);
        for specific in node.children_named("specific") {
            if let Some(rule) = self.load_specific_case(specific, &ground.name, report)? {
                block.specific_cases.push(rule);
            }
        }
        Ok(Some(block))
    }

    /// Piece of a configured rule set on a named edge, 0 if unset
    fn rule_set_piece(&self, border_id: u16, edge: &str, report: &mut LoadReport) -> Option<ItemId> {
        let Some(rule_set) = self.rule_set_by_id(border_id) else {
            report.warn(format!("Unknown border id {} in specific case block", border_id));
            return None;
        };
        Some(
            Edge::from_name(edge)
                .and_then(|edge| self.rule_set(rule_set).piece(edge))
                .unwrap_or(0),
        )
    }

    /// Validate a replacement target and tag it as a border item
    fn claim_replacement(&mut self, with: ItemId, material: &str) -> Result<(), LoadError> {
        match self.items_mut().get_mut(with) {
            Some(item) => {
                item.is_border = true;
                Ok(())
            }
            None => Err(LoadError::UndefinedReplacement {
                material: material.to_string(),
                item: with,
            }),
        }
    }

    fn load_specific_case(
        &mut self,
        node: &ConfigNode,
        material: &str,
        report: &mut LoadReport,
    ) -> Result<Option<SpecificCaseRule>, LoadError> {
        let mut rule = SpecificCaseRule::new();
        let mut replace = None;
        let mut delete_all = false;
        let mut defined = false;

        for conditions in node.children_named("conditions") {
            for condition in &conditions.children {
                match condition.name.to_ascii_lowercase().as_str() {
                    "match_border" => {
                        let (Some(border_id), Some(edge)) =
                            (condition.attr_as::<u16>("id"), condition.attr("edge"))
                        else {
                            continue;
                        };
                        // An unset piece yields id 0, which keeps the rule from firing
                        let Some(piece) = self.rule_set_piece(border_id, edge, report) else {
                            continue;
                        };
                        rule.predicates.push(MatchPredicate::Item(piece));
                    }
                    "match_group" => {
                        let (Some(group), Some(edge)) =
                            (condition.attr_as::<u16>("group"), condition.attr("edge"))
                        else {
                            continue;
                        };
                        rule.predicates.push(MatchPredicate::Group {
                            group,
                            alignment: Edge::from_name(edge),
                        });
                    }
                    "match_item" => {
                        let Some(id) = condition.attr_as::<ItemId>("id") else {
                            continue;
                        };
                        rule.predicates.push(MatchPredicate::Item(id));
                    }
                    _ => continue,
                }
                defined = true;
            }
        }

        for actions in node.children_named("actions") {
            for action in &actions.children {
                match action.name.to_ascii_lowercase().as_str() {
                    "replace_border" => {
                        let (Some(border_id), Some(edge), Some(with)) = (
                            action.attr_as::<u16>("id"),
                            action.attr("edge"),
                            action.attr("with"),
                        ) else {
                            continue;
                        };
                        let Some(to_replace) = self.rule_set_piece(border_id, edge, report) else {
                            continue;
                        };
                        let with = with.trim().parse().unwrap_or(0);
                        self.claim_replacement(with, material)?;
                        replace = Some(SpecificAction::Replace { to_replace, with });
                    }
                    "replace_item" => {
                        let (Some(to_replace), Some(with)) =
                            (action.attr_as::<ItemId>("id"), action.attr("with"))
                        else {
                            continue;
                        };
                        let with = with.trim().parse().unwrap_or(0);
                        self.claim_replacement(with, material)?;
                        replace = Some(SpecificAction::Replace { to_replace, with });
                    }
                    "delete_borders" => delete_all = true,
                    _ => continue,
                }
                defined = true;
            }
        }

        if !defined {
            return Ok(None);
        }
        rule.action = if delete_all {
            Some(SpecificAction::DeleteAll)
        } else {
            replace
        };
        rule.keep_border = node.attr_bool("keep_border").unwrap_or(false);
        Ok(Some(rule))
    }

    fn load_friend(&self, node: &ConfigNode, ground: &mut GroundMaterial, hate: bool, report: &mut LoadReport) {
        let name = node.attr("name").unwrap_or_default();
        if name == "all" {
            ground.friends.push(FriendRef::All);
        } else if !name.is_empty() {
            match self.brush_id(name) {
                Some(id) => ground.friends.push(FriendRef::Material(id)),
                None => report.warn(format!("Brush '{}' is not defined", name)),
            }
        }
        ground.hate_friends = hate;
    }

    // ─── Walls, carpets and tables ───────────────────────────────────────────

    fn load_stack<F>(
        &mut self,
        node: &ConfigNode,
        id: MaterialId,
        name: &str,
        report: &mut LoadReport,
        mut tag: F,
    ) -> StackMaterial
    where
        F: FnMut(&mut ItemType),
    {
        let mut material = StackMaterial::new(id, name);
        let mut item_ids = Vec::new();
        collect_item_ids(node, &mut item_ids);

        for item_id in item_ids {
            match self.items_mut().get_mut(item_id) {
                Some(item) => {
                    tag(item);
                    if !material.has_item(item_id) {
                        material.items.push(item_id);
                    }
                }
                None => report.warn(format!("Brush '{}': invalid item id {}", name, item_id)),
            }
        }
        material
    }
}

/// Item ids under a brush node, including those nested in variant nodes
fn collect_item_ids(node: &ConfigNode, out: &mut Vec<ItemId>) {
    for child in &node.children {
        if child.is("item") {
            out.push(child.attr_as("id").unwrap_or(0));
        } else {
            collect_item_ids(child, out);
        }
    }
}
