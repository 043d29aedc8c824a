//! Response logic for webhook interactions
//!
//! # Notes
//!
//! An interaction received over the webhook is acknowledged by the body of the
//! HTTP response to the request that delivered it:
//! - You **must** create **at most one** response per interaction
//! - Returning no response body leaves the interaction unacknowledged, and the
//!   user is shown a generic failure once the platform's timeout elapses
//! - `PING` is only ever answered with `PONG`, which is handled by the webhook
//!   receiver before any responder exists
//!
//! The responder types below capture the single response produced by a handler
//! into a [`BorrowedResponder`] slot owned by the caller, and the type-state
//! tokens returned from each step prove to the caller that a response was
//! produced (or deliberately withheld).

use std::marker::PhantomData;

use serenity::builder::CreateInteractionResponse;

use super::Message;

/// A response slot that can be borrowed and filled by a [`BorrowingResponder`]
#[derive(Debug, Default)]
pub enum BorrowedResponder {
    /// No response has been produced yet
    #[default]
    Init,
    /// A response was produced
    Created(CreateInteractionResponse),
    /// The handler chose not to respond
    Void,
}

impl BorrowedResponder {
    /// Returns true if no response has been produced or declined yet
    #[inline]
    #[must_use]
    pub fn is_init(&self) -> bool { matches!(self, Self::Init) }

    /// Start responding through this slot
    ///
    /// # Panics
    /// This method panics if the slot is not in its
    /// [`Init`](BorrowedResponder::Init) state.
    #[inline]
    pub fn init(&mut self) -> InitResponder<'_> {
        assert!(self.is_init(), "Attempt to respond twice to one interaction");
        InitResponder(self)
    }

    /// Consume the slot, returning the captured response if one was produced
    #[inline]
    #[must_use]
    pub fn into_response(self) -> Option<CreateInteractionResponse> {
        match self {
            Self::Created(res) => Some(res),
            Self::Init | Self::Void => None,
        }
    }
}

/// A responder in its initial state
///
/// In this state, a response must be created (or declined) before any other
/// operations may occur.
#[derive(Debug)]
#[repr(transparent)]
pub struct InitResponder<'a>(&'a mut BorrowedResponder);

impl<'a> InitResponder<'a> {
    /// Create a channel message response
    #[inline]
    pub fn create_message(self, msg: Message) -> CreatedResponder<'a> {
        *self.0 = BorrowedResponder::Created(CreateInteractionResponse::Message(msg.into()));
        CreatedResponder(PhantomData)
    }

    /// Decline to respond to this interaction
    #[inline]
    pub fn decline(self) -> VoidResponder<'a> {
        *self.0 = BorrowedResponder::Void;
        VoidResponder(PhantomData)
    }
}

/// A responder in its post-create state
///
/// In this state, a response message has been created.
#[derive(Debug)]
#[repr(transparent)]
pub struct CreatedResponder<'a>(PhantomData<&'a mut BorrowedResponder>);

/// A responder in its "voided" state
///
/// In this state, no response exists or the responder was voided.  No
/// additional response actions may be performed.
#[derive(Debug)]
#[repr(transparent)]
pub struct VoidResponder<'a>(PhantomData<&'a mut BorrowedResponder>);

/// An "acknowledged" responder
///
/// This wrapper holds a responder that is guaranteed to have settled its
/// response, whether or not a message was created.
#[derive(Debug)]
pub enum AckedResponder<'a> {
    /// A responder created a message
    Created(CreatedResponder<'a>),
    /// A responder did not create a message or was voided
    Void(VoidResponder<'a>),
}

impl<'a> From<CreatedResponder<'a>> for AckedResponder<'a> {
    #[inline]
    fn from(val: CreatedResponder<'a>) -> Self { Self::Created(val) }
}

impl<'a> From<VoidResponder<'a>> for AckedResponder<'a> {
    #[inline]
    fn from(val: VoidResponder<'a>) -> Self { Self::Void(val) }
}

/// A responder that mutates a [`BorrowedResponder`] when used, to synchronize
/// type-states outside of a handler function
#[derive(Debug)]
#[repr(transparent)]
pub struct BorrowingResponder<'a>(InitResponder<'a>);

impl<'a> BorrowingResponder<'a> {
    /// Borrow an existing [`BorrowedResponder`]
    ///
    /// # Panics
    /// This function panics if the borrowed responder is not in its
    /// [`Init`](BorrowedResponder::Init) state.
    #[inline]
    #[must_use]
    pub fn new(resp: &'a mut BorrowedResponder) -> Self { Self(resp.init()) }

    /// Create a channel message response
    #[inline]
    pub fn create_message(self, msg: Message) -> CreatedResponder<'a> {
        self.0.create_message(msg)
    }

    /// Decline to respond to this interaction
    #[inline]
    pub fn decline(self) -> VoidResponder<'a> { self.0.decline() }
}
