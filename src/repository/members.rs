//! Members repository: the in-memory members collection and its store

use crate::{
    error::{AppError, AppResult},
    models::member::Member,
    repository::store::{JsonStore, StoreIssue},
};

#[derive(Debug)]
pub struct MembersRepository {
    store: JsonStore,
    key: String,
    members: Vec<Member>,
    next_id: u32,
}

impl MembersRepository {
    /// Load the members collection; a failed load starts empty.
    /// Ids are never reused, so the next id follows the highest stored one.
    pub fn load(store: JsonStore, key: &str) -> (Self, Option<StoreIssue>) {
        let loaded = store.load::<Member>(key);
        let next_id = loaded.records.iter().map(|m| m.id).max().map_or(1, |max| max + 1);
        let repo = Self {
            store,
            key: key.to_string(),
            members: loaded.records,
            next_id,
        };
        (repo, loaded.issue)
    }

    pub fn save(&self) -> AppResult<()> {
        self.store.save(&self.key, &self.members)
    }

    pub fn all(&self) -> &[Member] {
        &self.members
    }

    /// Keep `next_id` above ids still referenced elsewhere, such as the
    /// borrowers of books whose member record was lost with its store
    pub fn reserve_ids(&mut self, ids: impl IntoIterator<Item = u32>) {
        if let Some(max) = ids.into_iter().max() {
            self.next_id = self.next_id.max(max + 1);
        }
    }

    /// Get member by ID
    pub fn get_by_id(&self, id: u32) -> AppResult<&Member> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .ok_or(AppError::MemberNotFound(id))
    }

    pub fn get_by_id_mut(&mut self, id: u32) -> AppResult<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AppError::MemberNotFound(id))
    }

    /// Create a member under the next id
    pub fn create(&mut self, name: String) -> &Member {
        let id = self.next_id;
        self.next_id += 1;
        self.members.push(Member::new(id, name));
        &self.members[self.members.len() - 1]
    }
}
