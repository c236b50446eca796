//! Member operations

use validator::Validate;

use crate::{
    error::AppResult,
    models::member::{Member, NewMember},
};

use super::Catalog;

impl Catalog {
    /// Register a member under the next id
    pub fn register_member(&mut self, name: &str) -> AppResult<Member> {
        let req = NewMember::new(name);
        req.validate()?;

        let member = self.repository.members.create(req.name).clone();
        self.repository.members.save()?;

        tracing::info!("Catalog register: member {} '{}'", member.id, member.name);
        Ok(member)
    }

    /// Get member by ID
    pub fn get_member(&self, id: u32) -> AppResult<&Member> {
        self.repository.members.get_by_id(id)
    }

    /// Members in registration order
    pub fn list_members(&self) -> impl Iterator<Item = &Member> + '_ {
        self.repository.members.all().iter()
    }

    /// Under the loan limit and without penalties
    pub fn can_borrow(&self, member: &Member) -> bool {
        member.can_borrow(self.rules.max_loans)
    }

    /// Reset a member's penalty count, returning the count that was cleared
    pub fn clear_penalties(&mut self, id: u32) -> AppResult<u32> {
        let member = self.repository.members.get_by_id_mut(id)?;
        let cleared = std::mem::take(&mut member.penalty_count);
        if cleared > 0 {
            self.repository.members.save()?;
            tracing::info!("Catalog penalties: cleared {} for member {}", cleared, id);
        }
        Ok(cleared)
    }
}
