//! In-memory execution of an accessor plan.
//!
//! [`AttributeInstance`] behaves like an instance of a generated class: it
//! answers Get/Set/Has/GetAll with the same first-match order and the same
//! per-category conversions as the emitted C++, so marshalling can be
//! checked without a C++ toolchain.

use std::collections::{BTreeMap, HashMap};

use attrgen_core::{Category, InterfaceId};
use attrgen_resolver::AttributeKey;

use super::plan::{AccessorEntry, AccessorPlan};

/// Units accepted after a length number.
const LENGTH_UNITS: [&str; 9] = ["px", "em", "ex", "in", "cm", "mm", "pt", "pc", "%"];

/// The stored value of one attribute.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Enum(u16),
    Integer(i64),
    Boolean(bool),
    Float(f32),
    String(String),
    Length { number: f32, unit: &'static str },
    /// Types with their own string contract keep their canonical text.
    Serialized(String),
}

impl Value {
    fn initial(category: Category) -> Self {
        match category {
            Category::Enum => Self::Enum(0),
            Category::Integer => Self::Integer(0),
            Category::Boolean => Self::Boolean(false),
            Category::Float => Self::Float(0.0),
            Category::String => Self::String(String::new()),
            Category::Length => Self::Length {
                number: 0.0,
                unit: "",
            },
            Category::ListOrRect | Category::OpaqueSerializable | Category::StyleDeclaration => {
                Self::Serialized(String::new())
            }
        }
    }

    fn parse(entry: &AccessorEntry, text: &str) -> Option<Self> {
        match entry.category {
            Category::Enum => match &entry.binding {
                Some(binding) => binding
                    .value_of(text)
                    .and_then(|v| u16::try_from(v).ok())
                    .map(Self::Enum),
                None => text.parse::<u16>().ok().map(Self::Enum),
            },
            Category::Integer => text.parse::<i64>().ok().map(Self::Integer),
            Category::Boolean => match text {
                "true" => Some(Self::Boolean(true)),
                "false" => Some(Self::Boolean(false)),
                _ => None,
            },
            Category::Float => text.parse::<f32>().ok().map(Self::Float),
            Category::String => Some(Self::String(text.to_string())),
            Category::Length => parse_length(text).map(|(number, unit)| Self::Length { number, unit }),
            Category::ListOrRect | Category::OpaqueSerializable | Category::StyleDeclaration => {
                Some(Self::Serialized(text.to_string()))
            }
        }
    }

    fn serialize(&self, entry: &AccessorEntry) -> String {
        match self {
            Self::Enum(value) => match &entry.binding {
                Some(binding) => binding
                    .keyword_of(u32::from(*value))
                    .unwrap_or_default()
                    .to_string(),
                None => value.to_string(),
            },
            Self::Integer(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
            Self::Float(value) => format_g(f64::from(*value)),
            Self::String(text) | Self::Serialized(text) => text.clone(),
            Self::Length { number, unit } => format!("{}{}", format_g(f64::from(*number)), unit),
        }
    }
}

/// Split a length into its number and unit.
fn parse_length(text: &str) -> Option<(f32, &'static str)> {
    for unit in LENGTH_UNITS {
        if let Some(number) = text.strip_suffix(unit) {
            if let Ok(number) = number.parse::<f32>() {
                return Some((number, unit));
            }
        }
    }
    text.parse::<f32>().ok().map(|number| (number, ""))
}

/// C `printf("%g")` with the default precision of six significant digits.
pub fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // The exponent after rounding to the target precision.
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (PRECISION - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Drop trailing fractional zeros, and the point if nothing is left after it.
fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// A live object of one generated class.
#[derive(Debug, Clone)]
pub struct AttributeInstance<'p> {
    plan: &'p AccessorPlan,
    interface: InterfaceId,
    values: HashMap<AttributeKey, Value>,
    style: BTreeMap<String, String>,
}

impl<'p> AttributeInstance<'p> {
    pub fn new(plan: &'p AccessorPlan, interface: InterfaceId) -> Self {
        Self {
            plan,
            interface,
            values: HashMap::new(),
            style: BTreeMap::new(),
        }
    }

    /// An instance of the named interface.
    pub fn of(plan: &'p AccessorPlan, interface: &str) -> Option<Self> {
        plan.id_of(interface).map(|id| Self::new(plan, id))
    }

    pub fn get(&self, name: &str) -> String {
        self.get_in(self.interface, name)
    }

    pub fn set(&mut self, name: &str, value: &str) -> bool {
        self.set_in(self.interface, name, value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.has_in(self.interface, name)
    }

    /// Every attribute with its current text; the first writer of a name wins.
    pub fn get_all(&self) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::new();
        self.get_all_in(self.interface, &mut attributes);
        attributes
    }

    fn style_has(&self, name: &str) -> bool {
        self.plan.style_properties.contains(name)
    }

    fn value(&self, entry: &AccessorEntry) -> Value {
        self.values
            .get(&entry.key)
            .cloned()
            .unwrap_or_else(|| Value::initial(entry.category))
    }

    fn get_in(&self, id: InterfaceId, name: &str) -> String {
        let Some(iface) = self.plan.get(id) else {
            return String::new();
        };

        for entry in &iface.entries {
            if entry.category == Category::StyleDeclaration {
                if self.style_has(name) {
                    return self.style.get(name).cloned().unwrap_or_default();
                }
            } else if entry.name == name {
                return self.value(entry).serialize(entry);
            }
        }

        for &base in &iface.bases {
            if self.has_in(base, name) {
                return self.get_in(base, name);
            }
        }

        String::new()
    }

    fn set_in(&mut self, id: InterfaceId, name: &str, text: &str) -> bool {
        let plan = self.plan;
        let Some(iface) = plan.get(id) else {
            return false;
        };

        for entry in &iface.entries {
            if entry.category == Category::StyleDeclaration {
                if self.style_has(name) {
                    self.style.insert(name.to_string(), text.to_string());
                    return true;
                }
            } else if entry.name == name {
                return match Value::parse(entry, text) {
                    Some(value) => {
                        self.values.insert(entry.key, value);
                        true
                    }
                    None => false,
                };
            }
        }

        for &base in &iface.bases {
            if self.has_in(base, name) {
                return self.set_in(base, name, text);
            }
        }

        false
    }

    fn has_in(&self, id: InterfaceId, name: &str) -> bool {
        let Some(iface) = self.plan.get(id) else {
            return false;
        };

        let own = iface.entries.iter().any(|entry| {
            if entry.category == Category::StyleDeclaration {
                self.style_has(name)
            } else {
                entry.name == name
            }
        });

        own || iface.bases.iter().any(|&base| self.has_in(base, name))
    }

    fn get_all_in(&self, id: InterfaceId, attributes: &mut BTreeMap<String, String>) {
        let Some(iface) = self.plan.get(id) else {
            return;
        };

        for entry in &iface.entries {
            if entry.category == Category::StyleDeclaration {
                for (name, value) in &self.style {
                    attributes
                        .entry(name.clone())
                        .or_insert_with(|| value.clone());
                }
            } else {
                let value = self.get_in(id, &entry.name);
                attributes.entry(entry.name.clone()).or_insert(value);
            }
        }

        for &base in &iface.bases {
            self.get_all_in(base, attributes);
        }
    }
}
