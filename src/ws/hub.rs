//! In-process room registry for the three audience scopes of §4.9:
//! `game-{id}`, `spectator-{tableId}`, `table-{id}`. Cross-process
//! replication is a stated non-goal, so unlike the pub/sub relay this is
//! modeled on, there is no external broker here — membership and fan-out
//! both live in this one process's memory.

use actix::{Message, Recipient};
use dashmap::DashMap;
use uuid::Uuid;

use crate::ws::protocol::ServerEvent;

#[derive(Message)]
#[rtype(result = "()")]
pub struct Push(pub ServerEvent);

struct RoomMember {
    recipient: Recipient<Push>,
    /// The seat this connection should see its own hand for; `None` for
    /// spectators and pre-game table-room members.
    viewer_seat: Option<u8>,
}

#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, DashMap<Uuid, RoomMember>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, room: &str, conn_id: Uuid, recipient: Recipient<Push>, viewer_seat: Option<u8>) {
        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(conn_id, RoomMember { recipient, viewer_seat });
    }

    pub fn leave(&self, room: &str, conn_id: &Uuid) {
        if let Some(members) = self.rooms.get(room) {
            members.remove(conn_id);
        }
    }

    /// Removes a connection from every room it may have joined. Used on
    /// socket close, since a session does not track its own membership.
    pub fn leave_all(&self, conn_id: &Uuid) {
        for members in self.rooms.iter() {
            members.remove(conn_id);
        }
    }

    /// Calls `build(viewer_seat)` once per member and pushes the result,
    /// so each recipient gets a snapshot with only their own hand
    /// revealed.
    pub fn broadcast_with(&self, room: &str, build: impl Fn(Option<u8>) -> ServerEvent) {
        let Some(members) = self.rooms.get(room) else {
            return;
        };
        for entry in members.iter() {
            let event = build(entry.value().viewer_seat);
            let _ = entry.value().recipient.do_send(Push(event));
        }
    }

    pub fn member_count(&self, room: &str) -> usize {
        self.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_room_broadcast_is_a_no_op() {
        let hub = RoomRegistry::new();
        hub.broadcast_with("game-1", |_| ServerEvent::TableLeft {
            table_id: "t".to_string(),
        });
        assert_eq!(hub.member_count("game-1"), 0);
    }
}
