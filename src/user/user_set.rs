use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A set of user ids. Backs a task's team and a notification's read markers;
/// stored as `uuid[]` and serialised as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Uuid>", into = "Vec<Uuid>")]
pub struct UserSet(BTreeSet<Uuid>);

impl UserSet {
    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_vec(&self) -> Vec<Uuid> {
        self.0.iter().copied().collect()
    }
}

impl From<Vec<Uuid>> for UserSet {
    fn from(ids: Vec<Uuid>) -> Self {
        Self(ids.into_iter().collect())
    }
}

impl From<UserSet> for Vec<Uuid> {
    fn from(set: UserSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl FromIterator<Uuid> for UserSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
