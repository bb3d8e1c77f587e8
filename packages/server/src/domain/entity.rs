//! Domain entities: rooms, their members, and the per-connection lifecycle.

use std::collections::HashMap;

use super::{
    ConnectionId, LifecycleError, RoomCapacity, RoomCode, RoomError, Timestamp, UserId,
};

/// A member's bookkeeping inside a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Authenticated owner of the connection (None when anonymous)
    pub user_id: Option<UserId>,
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(user_id: Option<UserId>, joined_at: Timestamp) -> Self {
        Self { user_id, joined_at }
    }
}

/// Room entity
///
/// A named group of live connections. The registry keeps a room only while it
/// has at least one member; the entity itself just enforces capacity and
/// unique membership per connection handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub code: RoomCode,
    pub members: HashMap<ConnectionId, Member>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(code: RoomCode, created_at: Timestamp) -> Self {
        Self {
            code,
            members: HashMap::new(),
            created_at,
        }
    }

    /// Admit a connection, returning the occupancy after admission.
    ///
    /// A connection that is already a member is not counted twice and is
    /// admitted again without touching its original entry.
    pub fn admit(
        &mut self,
        connection_id: ConnectionId,
        member: Member,
        capacity: RoomCapacity,
    ) -> Result<usize, RoomError> {
        if self.members.contains_key(&connection_id) {
            return Ok(self.members.len());
        }
        if self.members.len() >= capacity.get() {
            return Err(RoomError::RoomFull {
                capacity: capacity.get(),
            });
        }
        self.members.insert(connection_id, member);
        Ok(self.members.len())
    }

    /// Remove a connection. Returns whether it was a member.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn occupancy(&self) -> usize {
        self.members.len()
    }

    pub fn has_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains_key(connection_id)
    }

    /// Every member except `exclude`
    pub fn members_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .keys()
            .filter(|id| *id != exclude)
            .copied()
            .collect()
    }
}

/// Opaque relayed frame. Never inspected by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Text(text) => text.len(),
            Payload::Binary(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lifecycle phase of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticating,
    Joining,
    Joined,
    Closing,
    Closed,
}

impl ConnectionState {
    /// Whether the state machine permits `self -> next`
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        matches!(
            (self, next),
            (Connecting, Authenticating)
                | (Authenticating, Closed)
                | (Authenticating, Joining)
                | (Joining, Closed)
                | (Joining, Joined)
                | (Joined, Closing)
                | (Closing, Closed)
        )
    }
}

/// Connection entity
///
/// Owned by the handler that serves the socket. The registry only ever holds
/// its [`ConnectionId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub user_id: Option<UserId>,
    pub room: Option<RoomCode>,
    state: ConnectionState,
}

impl Connection {
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            user_id: None,
            room: None,
            state: ConnectionState::Connecting,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Protocol upgrade accepted
    pub fn begin_authentication(&mut self) -> Result<(), LifecycleError> {
        self.transition(ConnectionState::Authenticating)
    }

    /// Session collaborator accepted the request
    pub fn authenticated(&mut self, user_id: Option<UserId>) -> Result<(), LifecycleError> {
        self.transition(ConnectionState::Joining)?;
        self.user_id = user_id;
        Ok(())
    }

    /// Registry admitted the connection into `room`
    pub fn joined(&mut self, room: RoomCode) -> Result<(), LifecycleError> {
        self.transition(ConnectionState::Joined)?;
        self.room = Some(room);
        Ok(())
    }

    /// Receive loop ended
    pub fn closing(&mut self) -> Result<(), LifecycleError> {
        self.transition(ConnectionState::Closing)
    }

    /// Terminal state, reachable from authentication, joining or closing
    pub fn closed(&mut self) -> Result<(), LifecycleError> {
        self.transition(ConnectionState::Closed)?;
        self.room = None;
        Ok(())
    }

    fn transition(&mut self, next: ConnectionState) -> Result<(), LifecycleError> {
        if !self.state.can_transition_to(next) {
            return Err(LifecycleError::InvalidTransition {
                connection: self.id,
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
