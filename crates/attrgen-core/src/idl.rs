//! Interface grammar model.
//!
//! Everything here is produced by the interface parser and treated as
//! immutable afterwards. Interfaces are identified by name through
//! [`InterfaceTable`], which also hands out stable [`InterfaceId`]s in
//! declaration order.

use indexmap::IndexMap;
use smallvec::SmallVec;

/// Infix marking a type that wraps a base value with a separate animated value.
const ANIMATED_INFIX: &str = "Animated";

/// Suffix marking an ordered-list type.
const LIST_SUFFIX: &str = "List";

/// Whether a declared type holds one value or an ordered list of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    Scalar,
    List,
}

/// A declared attribute type, split into its parts.
///
/// `SVGAnimatedLengthList` becomes `value_type = "SVGLengthList"`,
/// `base = "SVGLength"`, `animated = true`, `multiplicity = List`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The type exactly as declared (whitespace normalised).
    pub declared: String,
    /// The declared type with the "Animated" infix removed.
    pub value_type: String,
    /// The element type name (list suffix removed for list types).
    pub base: String,
    pub animated: bool,
    pub multiplicity: Multiplicity,
}

impl TypeRef {
    /// Split a declared type name.
    pub fn parse(declared: &str) -> Self {
        let declared = declared.split_whitespace().collect::<Vec<_>>().join(" ");

        let (value_type, animated) = match declared.find(ANIMATED_INFIX) {
            Some(idx) if idx + ANIMATED_INFIX.len() < declared.len() => {
                let mut stripped = String::with_capacity(declared.len());
                stripped.push_str(&declared[..idx]);
                stripped.push_str(&declared[idx + ANIMATED_INFIX.len()..]);
                (stripped, true)
            }
            _ => (declared.clone(), false),
        };

        let (base, multiplicity) = match value_type.strip_suffix(LIST_SUFFIX) {
            Some(element) if !element.is_empty() => (element.to_string(), Multiplicity::List),
            _ => (value_type.clone(), Multiplicity::Scalar),
        };

        Self {
            declared,
            value_type,
            base,
            animated,
            multiplicity,
        }
    }

    pub fn is_list(&self) -> bool {
        self.multiplicity == Multiplicity::List
    }
}

/// An `attribute` line inside an interface block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: String,
    pub type_ref: TypeRef,
    pub readonly: bool,
    /// Exception names from `raises`/`getraises`/`setraises` clauses.
    pub raises: Vec<String>,
}

/// One `const unsigned short NAME = N` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub value: u32,
}

/// Constants grouped into a single enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumGroupDecl {
    /// Synthesized from the first constant: everything before its last `_` segment.
    pub name: String,
    pub constants: Vec<EnumConstant>,
}

impl EnumGroupDecl {
    /// Start a group seeded by `first`.
    pub fn seeded_by(first: EnumConstant) -> Self {
        Self {
            name: enum_group_name(&first.name).to_string(),
            constants: vec![first],
        }
    }

    /// The part of a constant name after the group name, e.g. `USERSPACEONUSE`
    /// for `SVG_UNIT_TYPE_USERSPACEONUSE` in group `SVG_UNIT_TYPE`.
    pub fn suffix_of<'a>(&self, constant: &'a EnumConstant) -> &'a str {
        constant
            .name
            .strip_prefix(self.name.as_str())
            .map(|rest| rest.trim_start_matches('_'))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(&constant.name)
    }
}

/// The group name for a constant: the name up to, excluding, its last `_` segment.
pub fn enum_group_name(constant: &str) -> &str {
    match constant.rfind('_') {
        Some(idx) if idx > 0 => &constant[..idx],
        _ => constant,
    }
}

/// Direction of a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgDirection {
    In,
    Out,
    InOut,
}

impl ArgDirection {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "inout" => Some(Self::InOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDecl {
    pub direction: ArgDirection,
    pub type_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    pub arguments: Vec<ArgumentDecl>,
    pub raises: Vec<String>,
}

/// An `interface Name : Base, ... { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    /// Base interfaces in declaration order. Order decides which base wins
    /// when two of them declare the same attribute.
    pub inherits: SmallVec<[String; 4]>,
    pub attributes: Vec<AttributeDecl>,
    pub enums: Vec<EnumGroupDecl>,
    pub methods: Vec<MethodDecl>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inherits: SmallVec::new(),
            attributes: Vec::new(),
            enums: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Find an own attribute by exact name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDecl> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Stable index of an interface inside its [`InterfaceTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(pub usize);

/// The global interface table, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceTable {
    interfaces: IndexMap<String, InterfaceDecl>,
}

impl InterfaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an interface. A redeclaration replaces the earlier body but
    /// keeps its position.
    pub fn insert(&mut self, decl: InterfaceDecl) -> InterfaceId {
        let (idx, _) = self.interfaces.insert_full(decl.name.clone(), decl);
        InterfaceId(idx)
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.get(name)
    }

    pub fn id_of(&self, name: &str) -> Option<InterfaceId> {
        self.interfaces.get_index_of(name).map(InterfaceId)
    }

    pub fn by_id(&self, id: InterfaceId) -> Option<&InterfaceDecl> {
        self.interfaces.get_index(id.0).map(|(_, decl)| decl)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.interfaces.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = InterfaceId> {
        (0..self.interfaces.len()).map(InterfaceId)
    }

    /// Every enumeration group with the interface that declares it.
    pub fn enum_groups(&self) -> impl Iterator<Item = (&InterfaceDecl, &EnumGroupDecl)> {
        self.iter()
            .flat_map(|iface| iface.enums.iter().map(move |group| (iface, group)))
    }

    /// Find an enumeration group by its synthesized name.
    pub fn enum_group(&self, name: &str) -> Option<&EnumGroupDecl> {
        self.enum_groups()
            .map(|(_, group)| group)
            .find(|group| group.name == name)
    }
}
