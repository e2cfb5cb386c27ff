//! Attendance attestation strategies.
//!
//! An event picks one [`AttestationKind`] at creation. The platform looks up
//! the matching [`AttestationPolicy`] when a registrant claims attendance and
//! hands it the evidence together with the organizer-published anchor.

use alloy_primitives::{keccak256, Address, Bytes, PrimitiveSignature, B256, U256};
use tracing::debug;

use crate::types::{AttestationKind, Event};

/// Proof material submitted by a claimant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationEvidence {
    /// Sibling hashes from the claimant's leaf up to the root.
    MerkleProof(Vec<B256>),
    /// The check-in code revealed at the venue and the claimant's EIP-191
    /// signature over `keccak256(eventId ‖ code)`.
    SignedCode { code: String, signature: Bytes },
    None,
}

/// Platform-side facts a policy may consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttestationContext {
    /// Merkle root or code hash set by the organizer. Zero when unset.
    pub anchor: B256,
    /// Tickets the claimant holds for the class they registered with.
    pub ticket_balance: U256,
}

pub trait AttestationPolicy {
    fn kind(&self) -> AttestationKind;

    fn verify(
        &self,
        event: &Event,
        claimant: Address,
        evidence: &AttestationEvidence,
        context: &AttestationContext,
    ) -> bool;
}

/// The policy backing each attestation kind.
pub fn policy_for(kind: AttestationKind) -> &'static dyn AttestationPolicy {
    match kind {
        AttestationKind::MerkleInclusion => &MerkleInclusionPolicy,
        AttestationKind::SignedCode => &SignedCodePolicy,
        AttestationKind::TicketHolder => &TicketHolderPolicy,
    }
}

// Merkle helpers

/// Hashes two nodes in sorted order so proofs need no position bits.
pub fn hash_pair(a: B256, b: B256) -> B256 {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left.as_slice());
    buf[32..].copy_from_slice(right.as_slice());
    keccak256(buf)
}

pub fn leaf_for(account: Address) -> B256 {
    keccak256(account.as_slice())
}

pub fn verify_merkle(proof: &[B256], root: B256, leaf: B256) -> bool {
    proof.iter().fold(leaf, |node, sibling| hash_pair(node, *sibling)) == root
}

/// Builds a root over `accounts` with the same sorted-pair rule. An odd node
/// is promoted to the next level unchanged.
pub fn merkle_root(accounts: &[Address]) -> B256 {
    let mut level: Vec<B256> = accounts.iter().map(|a| leaf_for(*a)).collect();
    if level.is_empty() {
        return B256::ZERO;
    }
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => hash_pair(*a, *b),
                [a] => *a,
                _ => B256::ZERO,
            })
            .collect();
    }
    level[0]
}

/// Proof for `accounts[index]` against [`merkle_root`] of the same list.
pub fn merkle_proof(accounts: &[Address], index: usize) -> Vec<B256> {
    let mut level: Vec<B256> = accounts.iter().map(|a| leaf_for(*a)).collect();
    let mut position = index;
    let mut proof = Vec::new();
    while level.len() > 1 {
        let sibling = position ^ 1;
        if sibling < level.len() {
            proof.push(level[sibling]);
        }
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => hash_pair(*a, *b),
                [a] => *a,
                _ => B256::ZERO,
            })
            .collect();
        position /= 2;
    }
    proof
}

// Signed-code helpers

pub fn code_hash(code: &str) -> B256 {
    keccak256(code.as_bytes())
}

/// The 32-byte digest a claimant signs (EIP-191 personal message).
pub fn check_in_digest(event_id: U256, code: &str) -> B256 {
    let mut buf = Vec::with_capacity(32 + code.len());
    buf.extend_from_slice(&event_id.to_be_bytes::<32>());
    buf.extend_from_slice(code.as_bytes());
    keccak256(buf)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MerkleInclusionPolicy;

impl AttestationPolicy for MerkleInclusionPolicy {
    fn kind(&self) -> AttestationKind {
        AttestationKind::MerkleInclusion
    }

    fn verify(
        &self,
        event: &Event,
        claimant: Address,
        evidence: &AttestationEvidence,
        context: &AttestationContext,
    ) -> bool {
        let AttestationEvidence::MerkleProof(proof) = evidence else {
            return false;
        };
        if context.anchor.is_zero() {
            debug!(event_id = %event.id, "no attendance root published");
            return false;
        }
        verify_merkle(proof, context.anchor, leaf_for(claimant))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignedCodePolicy;

impl AttestationPolicy for SignedCodePolicy {
    fn kind(&self) -> AttestationKind {
        AttestationKind::SignedCode
    }

    fn verify(
        &self,
        event: &Event,
        claimant: Address,
        evidence: &AttestationEvidence,
        context: &AttestationContext,
    ) -> bool {
        let AttestationEvidence::SignedCode { code, signature } = evidence else {
            return false;
        };
        if context.anchor.is_zero() || code_hash(code) != context.anchor {
            return false;
        }

        let raw: &[u8] = signature.as_ref();
        let signature = match PrimitiveSignature::try_from(raw) {
            Ok(signature) => signature,
            Err(e) => {
                debug!(event_id = %event.id, error = %e, "malformed check-in signature");
                return false;
            }
        };
        let digest = check_in_digest(event.id, code);
        match signature.recover_address_from_msg(digest.as_slice()) {
            Ok(signer) => signer == claimant,
            Err(_) => false,
        }
    }
}

/// Holding the ticket is enough.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketHolderPolicy;

impl AttestationPolicy for TicketHolderPolicy {
    fn kind(&self) -> AttestationKind {
        AttestationKind::TicketHolder
    }

    fn verify(
        &self,
        _event: &Event,
        _claimant: Address,
        _evidence: &AttestationEvidence,
        context: &AttestationContext,
    ) -> bool {
        context.ticket_balance > U256::ZERO
    }
}
