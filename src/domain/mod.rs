//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Cipher: the reversed-alphabet table and its transform
//! - Entities: Core business objects (InboundEvent, OutboundReply, UserStats)
//! - Traits: Abstractions for infrastructure (Bot, stores, randomness)

pub mod cipher;
pub mod entities;
pub mod traits;
