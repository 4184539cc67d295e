use rusqlite::Connection;
use tracing::info;

use crate::error::{LibraryError, Result};
use crate::models::{Member, MemberPatch};

use super::store::{allocate_id, atomically, load_collection, save_collection, Collection};

pub fn fetch_members(conn: &Connection) -> Result<Vec<Member>> {
    Ok(load_collection(conn, Collection::Members)?)
}

pub fn fetch_member(conn: &Connection, id: i64) -> Result<Member> {
    fetch_members(conn)?
        .into_iter()
        .find(|member| member.id == id)
        .ok_or(LibraryError::MemberNotFound(id))
}

/// Register a member under the next free id.
pub fn create_member(conn: &Connection, name: &str, email: &str) -> Result<Member> {
    atomically(conn, |conn| {
        let mut members = fetch_members(conn)?;
        let member = Member {
            id: allocate_id(conn, Collection::Members)?,
            name: name.to_string(),
            email: email.to_string(),
        };
        members.push(member.clone());
        save_collection(conn, Collection::Members, &members)?;
        info!(member_id = member.id, "member created");
        Ok(member)
    })
}

pub fn update_member(conn: &Connection, id: i64, patch: MemberPatch) -> Result<Member> {
    atomically(conn, |conn| {
        let mut members = fetch_members(conn)?;
        let member = members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or(LibraryError::MemberNotFound(id))?;
        patch.apply(member);
        let updated = member.clone();
        save_collection(conn, Collection::Members, &members)?;
        info!(member_id = id, "member updated");
        Ok(updated)
    })
}

/// Remove a member profile; their borrows and reservations stay on file.
pub fn delete_member(conn: &Connection, id: i64) -> Result<bool> {
    atomically(conn, |conn| {
        let mut members = fetch_members(conn)?;
        let before = members.len();
        members.retain(|member| member.id != id);
        if members.len() == before {
            return Ok(false);
        }
        save_collection(conn, Collection::Members, &members)?;
        info!(member_id = id, "member deleted");
        Ok(true)
    })
}
