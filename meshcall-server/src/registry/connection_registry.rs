use meshcall_core::{EndpointId, RoomId};
use std::collections::{BTreeSet, HashMap};

/// A room an endpoint was removed from, with whoever is still in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDeparture {
    pub room_id: RoomId,
    pub remaining: Vec<EndpointId>,
}

/// Room membership table.
///
/// Member lists keep join order (oldest first). A room whose last member
/// leaves is dropped, so an empty room and an unknown room look the same.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    rooms: HashMap<RoomId, Vec<EndpointId>>,
    endpoint_rooms: HashMap<EndpointId, BTreeSet<RoomId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the endpoint was not already a member.
    pub fn add_member(&mut self, room_id: &RoomId, endpoint: &EndpointId) -> bool {
        let members = self.rooms.entry(room_id.clone()).or_default();
        if members.contains(endpoint) {
            return false;
        }
        members.push(endpoint.clone());

        self.endpoint_rooms
            .entry(endpoint.clone())
            .or_default()
            .insert(room_id.clone());
        true
    }

    /// Returns `true` if the endpoint was a member.
    pub fn remove_member(&mut self, room_id: &RoomId, endpoint: &EndpointId) -> bool {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return false;
        };
        let Some(position) = members.iter().position(|m| m == endpoint) else {
            return false;
        };
        members.remove(position);

        if members.is_empty() {
            self.rooms.remove(room_id);
        }

        if let Some(rooms) = self.endpoint_rooms.get_mut(endpoint) {
            rooms.remove(room_id);
            if rooms.is_empty() {
                self.endpoint_rooms.remove(endpoint);
            }
        }
        true
    }

    pub fn members_of(&self, room_id: &RoomId) -> Vec<EndpointId> {
        self.rooms.get(room_id).cloned().unwrap_or_default()
    }

    pub fn contains(&self, room_id: &RoomId, endpoint: &EndpointId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|members| members.contains(endpoint))
    }

    pub fn rooms_of(&self, endpoint: &EndpointId) -> Vec<RoomId> {
        self.endpoint_rooms
            .get(endpoint)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Removes the endpoint from every room it was in.
    pub fn remove_endpoint_everywhere(&mut self, endpoint: &EndpointId) -> Vec<RoomDeparture> {
        let Some(rooms) = self.endpoint_rooms.remove(endpoint) else {
            return Vec::new();
        };

        let mut departures = Vec::with_capacity(rooms.len());
        for room_id in rooms {
            let Some(members) = self.rooms.get_mut(&room_id) else {
                continue;
            };
            members.retain(|m| m != endpoint);
            let remaining = members.clone();
            if remaining.is_empty() {
                self.rooms.remove(&room_id);
            }
            departures.push(RoomDeparture { room_id, remaining });
        }
        departures
    }
}
