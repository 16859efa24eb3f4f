use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Comparison algorithm assigned to a field. Parsed when the catalog is
/// built so an unknown kind fails at startup instead of silently defaulting
/// during a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Date,
    Number,
    Percentage,
    Category,
    Url,
}

impl FieldKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(FieldKind::Name),
            "date" => Some(FieldKind::Date),
            "number" => Some(FieldKind::Number),
            "percentage" => Some(FieldKind::Percentage),
            "category" => Some(FieldKind::Category),
            "url" => Some(FieldKind::Url),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Date => "date",
            FieldKind::Number => "number",
            FieldKind::Percentage => "percentage",
            FieldKind::Category => "category",
            FieldKind::Url => "url",
        }
    }
}

/// One graded field of a battle template, in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub weight: f64,
    pub kind: FieldKind,
    pub required: bool,
}

/// Per-battle configuration of expected fields, their weights, and
/// comparison kinds.
///
/// Weight sums are not uniform across battles (60 through 100) while the
/// composite scale stays fixed at 60 + 10 + 15 = 85, so battles have
/// different effective maxima before rescaling. Kept exactly as shipped
/// pending product direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleTemplate {
    pub battle_number: u8,
    pub name: String,
    fields: Vec<FieldSpec>,
}

impl BattleTemplate {
    /// Build a template from raw declarations, enforcing that required and
    /// typed fields are weighted and that every kind string is known.
    pub fn new(
        battle_number: u8,
        name: &str,
        weights: &[(&str, f64)],
        required: &[&str],
        kinds: &[(&str, &str)],
    ) -> Result<Self, TemplateError> {
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(weights.len());

        for (field, weight) in weights {
            if fields.iter().any(|spec| spec.name == *field) {
                return Err(TemplateError::DuplicateField {
                    battle: battle_number,
                    field: (*field).to_string(),
                });
            }
            fields.push(FieldSpec {
                name: (*field).to_string(),
                weight: *weight,
                kind: FieldKind::Name,
                required: false,
            });
        }

        for field in required {
            let spec = fields
                .iter_mut()
                .find(|spec| spec.name == *field)
                .ok_or_else(|| TemplateError::UnweightedField {
                    battle: battle_number,
                    field: (*field).to_string(),
                })?;
            spec.required = true;
        }

        for (field, raw_kind) in kinds {
            let kind = FieldKind::parse(raw_kind).ok_or_else(|| TemplateError::UnknownFieldKind {
                battle: battle_number,
                field: (*field).to_string(),
                raw: (*raw_kind).to_string(),
            })?;
            let spec = fields
                .iter_mut()
                .find(|spec| spec.name == *field)
                .ok_or_else(|| TemplateError::UnweightedField {
                    battle: battle_number,
                    field: (*field).to_string(),
                })?;
            spec.kind = kind;
        }

        Ok(Self {
            battle_number,
            name: name.to_string(),
            fields,
        })
    }

    /// Graded fields in declared order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name.as_str())
    }

    pub fn weight_sum(&self) -> f64 {
        self.fields.iter().map(|spec| spec.weight).sum()
    }

    /// Mapping-shaped view for the template listing endpoint.
    pub fn view(&self) -> TemplateView {
        TemplateView {
            name: self.name.clone(),
            field_weights: self
                .fields
                .iter()
                .map(|spec| (spec.name.clone(), spec.weight))
                .collect(),
            required_fields: self
                .fields
                .iter()
                .filter(|spec| spec.required)
                .map(|spec| spec.name.clone())
                .collect(),
            field_types: self
                .fields
                .iter()
                .map(|spec| (spec.name.clone(), spec.kind.label().to_string()))
                .collect(),
        }
    }
}

/// Serialized template description mirroring the intake contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateView {
    pub name: String,
    pub field_weights: BTreeMap<String, f64>,
    pub required_fields: Vec<String>,
    pub field_types: BTreeMap<String, String>,
}

/// Template declarations rejected at catalog construction.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("battle {battle}: field '{field}' declares unknown kind '{raw}'")]
    UnknownFieldKind { battle: u8, field: String, raw: String },
    #[error("battle {battle}: field '{field}' is not in the weight table")]
    UnweightedField { battle: u8, field: String },
    #[error("battle {battle}: field '{field}' declared twice")]
    DuplicateField { battle: u8, field: String },
}

/// Immutable table of battle templates, keyed by battle number.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: BTreeMap<u8, BattleTemplate>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<BattleTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.battle_number, template))
                .collect(),
        }
    }

    /// The five battles shipped with the game.
    pub fn standard() -> Self {
        let templates = vec![
            BattleTemplate::new(
                1,
                "Leadership Recon",
                &[
                    ("founders", 12.0),
                    ("key_executives", 18.0),
                    ("market_share", 20.0),
                    ("geographic_footprint", 10.0),
                ],
                &["founders", "key_executives", "market_share"],
                &[
                    ("founders", "name"),
                    ("key_executives", "name"),
                    ("market_share", "percentage"),
                    ("geographic_footprint", "category"),
                ],
            ),
            BattleTemplate::new(
                2,
                "Product Arsenal",
                &[
                    ("product_lines", 30.0),
                    ("pricing", 15.0),
                    ("social_presence", 20.0),
                    ("influencers", 15.0),
                ],
                &["product_lines", "pricing", "social_presence"],
                &[
                    ("product_lines", "category"),
                    ("pricing", "number"),
                    ("social_presence", "category"),
                    ("influencers", "name"),
                ],
            ),
            BattleTemplate::new(
                3,
                "Funding Fortification",
                &[
                    ("funding", 40.0),
                    ("investors", 20.0),
                    ("revenue", 25.0),
                    ("citations", 15.0),
                ],
                &["funding", "investors", "revenue"],
                &[
                    ("funding", "number"),
                    ("investors", "name"),
                    ("revenue", "number"),
                    ("citations", "url"),
                ],
            ),
            BattleTemplate::new(
                4,
                "Customer Frontlines",
                &[
                    ("b2c", 25.0),
                    ("b2b", 25.0),
                    ("reviews", 25.0),
                    ("citations", 25.0),
                ],
                &["b2c", "b2b", "reviews"],
                &[
                    ("b2c", "category"),
                    ("b2b", "category"),
                    ("reviews", "number"),
                    ("citations", "url"),
                ],
            ),
            BattleTemplate::new(
                5,
                "Alliance Forge",
                &[
                    ("partners", 25.0),
                    ("suppliers", 20.0),
                    ("growth", 25.0),
                    ("expansions", 15.0),
                    ("citations", 15.0),
                ],
                &["partners", "suppliers", "growth"],
                &[
                    ("partners", "name"),
                    ("suppliers", "name"),
                    ("growth", "percentage"),
                    ("expansions", "category"),
                    ("citations", "url"),
                ],
            ),
        ];

        let templates = templates
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .expect("built-in battle templates are valid");

        Self::new(templates)
    }

    pub fn get(&self, battle_no: u8) -> Option<&BattleTemplate> {
        self.templates.get(&battle_no)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u8, &BattleTemplate)> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_holds_five_battles() {
        let catalog = TemplateCatalog::standard();
        assert_eq!(catalog.len(), 5);

        let sums: Vec<f64> = catalog
            .iter()
            .map(|(_, template)| template.weight_sum())
            .collect();
        assert_eq!(sums, vec![60.0, 80.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn declared_field_order_is_preserved() {
        let catalog = TemplateCatalog::standard();
        let battle_one = catalog.get(1).expect("battle 1 exists");
        let names: Vec<&str> = battle_one
            .fields()
            .iter()
            .map(|spec| spec.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "founders",
                "key_executives",
                "market_share",
                "geographic_footprint"
            ]
        );
    }

    #[test]
    fn unknown_kind_is_rejected_at_build_time() {
        let result = BattleTemplate::new(
            9,
            "Bad Battle",
            &[("founders", 10.0)],
            &[],
            &[("founders", "fuzzy")],
        );
        assert!(matches!(
            result,
            Err(TemplateError::UnknownFieldKind { battle: 9, .. })
        ));
    }

    #[test]
    fn required_field_must_be_weighted() {
        let result = BattleTemplate::new(9, "Bad Battle", &[("founders", 10.0)], &["missing"], &[]);
        assert!(matches!(
            result,
            Err(TemplateError::UnweightedField { battle: 9, .. })
        ));
    }

    #[test]
    fn untyped_weighted_field_defaults_to_name() {
        let template = BattleTemplate::new(9, "Plain", &[("founders", 10.0)], &[], &[])
            .expect("template builds");
        assert_eq!(template.fields()[0].kind, FieldKind::Name);
    }
}
