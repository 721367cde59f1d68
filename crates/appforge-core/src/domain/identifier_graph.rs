//! Identifier graph: one opaque identifier per semantic role.
//!
//! Reference-graph artifacts (the Xcode project file) cross-reference their
//! sections by identifier. Every identifier used anywhere in such an artifact
//! must come from the run's [`SymbolTable`]; nothing renders an identifier it
//! did not look up by role.
//!
//! ```text
//! allocate(["project", "main-target"])   register("file:App.swift:ref")
//!              │                                     │
//!              └──────────────► SymbolTable ◄────────┘
//!                                   │ resolve(role)
//!                                   ▼
//!                          templates / verify(text)
//! ```
//!
//! Identifiers are 128 bits from an injectable [`IdSource`], rendered as 32
//! uppercase hex digits. A seeded source gives reproducible tables.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Mutex;

use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::trace;

use super::error::DomainError;

/// Rendered width of an [`ObjectId`].
pub const OBJECT_ID_WIDTH: usize = 32;

/// Opaque 128-bit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u128);

impl ObjectId {
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub const fn as_u128(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032X}", self.0)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Semantic slot name, e.g. `main-target` or `file:Acme/AcmeApp.swift:ref`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// File-reference role for a project-relative path.
    pub fn file_ref(path: &str) -> Self {
        Self(format!("file:{path}:ref"))
    }

    /// Build-file role for a project-relative path.
    pub fn file_build(path: &str) -> Self {
        Self(format!("file:{path}:build"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Random source
// ============================================================================

/// Source of identifier bits.
pub trait IdSource: Send {
    fn next_u128(&mut self) -> u128;
}

/// ChaCha20-backed source; entropy-seeded in production, fixed seed in tests.
pub struct ChaChaIdSource {
    rng: ChaCha20Rng,
}

impl ChaChaIdSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl IdSource for ChaChaIdSource {
    fn next_u128(&mut self) -> u128 {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        u128::from_be_bytes(bytes)
    }
}

// ============================================================================
// Symbol table
// ============================================================================

/// Role → identifier mapping for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    by_role: BTreeMap<Role, ObjectId>,
    #[serde(skip)]
    ids: HashSet<ObjectId>,
}

impl SymbolTable {
    pub fn get(&self, role: &str) -> Option<ObjectId> {
        self.by_role.get(&Role::new(role)).copied()
    }

    pub fn resolve(&self, role: &str) -> Result<ObjectId, DomainError> {
        self.get(role).ok_or_else(|| DomainError::UnresolvedRole {
            role: role.to_string(),
        })
    }

    pub fn contains_role(&self, role: &Role) -> bool {
        self.by_role.contains_key(role)
    }

    pub fn contains_id(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Role, &ObjectId)> {
        self.by_role.iter()
    }

    pub fn len(&self) -> usize {
        self.by_role.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }

    /// Identifier-shaped tokens in `text` that are not in this table.
    pub fn unresolved_tokens(&self, text: &str) -> Vec<String> {
        identifier_tokens(text)
            .filter(|token| {
                u128::from_str_radix(token, 16)
                    .map(|v| !self.ids.contains(&ObjectId(v)))
                    .unwrap_or(true)
            })
            .map(str::to_string)
            .collect()
    }

    /// Fails on the first identifier in `text` that this table never issued.
    pub fn verify(&self, text: &str) -> Result<(), DomainError> {
        match self.unresolved_tokens(text).into_iter().next() {
            Some(token) => Err(DomainError::DanglingReference { token }),
            None => Ok(()),
        }
    }

    fn insert(&mut self, role: Role, id: ObjectId) {
        self.ids.insert(id);
        self.by_role.insert(role, id);
    }
}

/// Words of exactly 32 uppercase hex digits.
fn identifier_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| {
            word.len() == OBJECT_ID_WIDTH
                && word
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
        })
}

// ============================================================================
// Graph
// ============================================================================

struct GraphState {
    table: SymbolTable,
    source: Box<dyn IdSource>,
}

/// Thread-safe allocator over a [`SymbolTable`].
///
/// Allocation and per-file registration share one lock, so concurrent steps
/// never draw overlapping identifiers.
pub struct IdentifierGraph {
    state: Mutex<GraphState>,
}

impl IdentifierGraph {
    pub fn new(source: impl IdSource + 'static) -> Self {
        Self {
            state: Mutex::new(GraphState {
                table: SymbolTable::default(),
                source: Box::new(source),
            }),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaChaIdSource::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaChaIdSource::seeded(seed))
    }

    /// Allocate one identifier per role.
    ///
    /// Fails without allocating anything if a role repeats within `roles` or
    /// is already in the table.
    pub fn allocate<S: AsRef<str>>(
        &self,
        roles: &[S],
    ) -> Result<BTreeMap<Role, ObjectId>, DomainError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| DomainError::IdentifierGraphPoisoned)?;

        let mut requested = HashSet::new();
        for role in roles {
            let role = Role::new(role.as_ref());
            if state.table.contains_role(&role) || !requested.insert(role.clone()) {
                return Err(DomainError::DuplicateRole {
                    role: role.to_string(),
                });
            }
        }

        let mut allocated = BTreeMap::new();
        for role in roles {
            let role = Role::new(role.as_ref());
            let id = draw_unique(&mut state);
            trace!(role = %role, id = %id, "allocated identifier");
            state.table.insert(role.clone(), id);
            allocated.insert(role, id);
        }
        Ok(allocated)
    }

    /// Append a single dynamically discovered role.
    pub fn register(&self, role: Role) -> Result<ObjectId, DomainError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| DomainError::IdentifierGraphPoisoned)?;
        if state.table.contains_role(&role) {
            return Err(DomainError::DuplicateRole {
                role: role.to_string(),
            });
        }
        let id = draw_unique(&mut state);
        trace!(role = %role, id = %id, "registered identifier");
        state.table.insert(role, id);
        Ok(id)
    }

    pub fn resolve(&self, role: &str) -> Result<ObjectId, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::IdentifierGraphPoisoned)?
            .table
            .resolve(role)
    }

    /// Copy of the table as it stands.
    pub fn snapshot(&self) -> Result<SymbolTable, DomainError> {
        Ok(self
            .state
            .lock()
            .map_err(|_| DomainError::IdentifierGraphPoisoned)?
            .table
            .clone())
    }
}

impl fmt::Debug for IdentifierGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.state.lock().map(|s| s.table.len()).unwrap_or(0);
        f.debug_struct("IdentifierGraph").field("roles", &len).finish()
    }
}

/// Draw until the value is new to this table. A repeat is astronomically
/// unlikely with a real source but possible with a degenerate test source.
fn draw_unique(state: &mut GraphState) -> ObjectId {
    loop {
        let id = ObjectId(state.source.next_u128());
        if !state.table.contains_id(id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields each value in order, then repeats the last forever.
    struct Scripted(Vec<u128>);

    impl IdSource for Scripted {
        fn next_u128(&mut self) -> u128 {
            if self.0.len() > 1 {
                self.0.remove(0)
            } else {
                self.0[0]
            }
        }
    }

    #[test]
    fn allocates_distinct_ids_per_role() {
        let graph = IdentifierGraph::seeded(7);
        let ids = graph.allocate(&["project", "main-target", "sources-phase"]).unwrap();
        assert_eq!(ids.len(), 3);
        let unique: HashSet<_> = ids.values().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(graph.resolve("project").unwrap(), ids[&Role::new("project")]);
    }

    #[test]
    fn duplicate_roles_fail_atomically() {
        let graph = IdentifierGraph::seeded(1);
        let err = graph.allocate(&["a", "b", "a"]).unwrap_err();
        assert_eq!(err, DomainError::DuplicateRole { role: "a".into() });
        assert!(graph.snapshot().unwrap().is_empty());

        graph.allocate(&["a"]).unwrap();
        assert!(graph.allocate(&["b", "a"]).is_err());
        assert!(graph.register(Role::new("a")).is_err());
        assert_eq!(graph.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn same_seed_same_table() {
        let a = IdentifierGraph::seeded(42);
        let b = IdentifierGraph::seeded(42);
        let roles = ["project", "main-group"];
        let first = a.allocate(&roles).unwrap();
        assert_eq!(first, b.allocate(&roles).unwrap());
        assert_ne!(first, IdentifierGraph::seeded(43).allocate(&roles).unwrap());
    }

    #[test]
    fn redraws_on_collision() {
        let graph = IdentifierGraph::new(Scripted(vec![5, 5, 5, 9]));
        let ids = graph.allocate(&["x", "y"]).unwrap();
        assert_eq!(ids[&Role::new("x")].as_u128(), 5);
        assert_eq!(ids[&Role::new("y")].as_u128(), 9);
    }

    #[test]
    fn renders_fixed_width_uppercase_hex() {
        let id = ObjectId::from_u128(0xabc);
        let text = id.to_string();
        assert_eq!(text.len(), OBJECT_ID_WIDTH);
        assert_eq!(text, "00000000000000000000000000000ABC");
    }

    #[test]
    fn verify_flags_unknown_tokens() {
        let graph = IdentifierGraph::seeded(3);
        let id = graph.register(Role::file_ref("Acme/AcmeApp.swift")).unwrap();
        let table = graph.snapshot().unwrap();

        let good = format!("{id} /* AcmeApp.swift */ = {{isa = PBXFileReference;}};");
        assert!(table.verify(&good).is_ok());

        let stray = ObjectId::from_u128(0xDEAD);
        let bad = format!("{good}\n{stray} = {{isa = PBXGroup;}};");
        assert_eq!(
            table.verify(&bad),
            Err(DomainError::DanglingReference {
                token: stray.to_string()
            })
        );
    }

    #[test]
    fn concurrent_registration_never_overlaps() {
        let graph = IdentifierGraph::seeded(11);
        std::thread::scope(|scope| {
            for worker in 0..4 {
                let graph = &graph;
                scope.spawn(move || {
                    for n in 0..25 {
                        graph
                            .register(Role::file_ref(&format!("w{worker}/f{n}.swift")))
                            .unwrap();
                    }
                });
            }
        });
        let table = graph.snapshot().unwrap();
        assert_eq!(table.len(), 100);
        let unique: HashSet<_> = table.iter().map(|(_, id)| *id).collect();
        assert_eq!(unique.len(), 100);
    }
}
