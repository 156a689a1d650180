//! The Verifier: policy-checked verification of untrusted input.
//!
//! A verifier decodes fulfillments and conditions under [`DecodeLimits`],
//! rejects conditions whose cost or types fall outside its configuration,
//! and only then runs hash and signature checks.

use cryptoconditions_core::{
    read_condition_with, read_fulfillment_with, Condition, ConditionType, ConditionTypeSet,
    DecodeLimits, Fulfillment,
};

use crate::error::{Error, Result};

/// Default ceiling on condition cost.
pub const DEFAULT_MAX_COST: u64 = 64 * 1024 * 1024;

/// Configuration for a [`Verifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Limits applied while decoding.
    pub limits: DecodeLimits,
    /// Conditions costing more than this are rejected before verification.
    pub max_cost: u64,
    /// Types a condition may have or nest.
    pub allowed_types: ConditionTypeSet,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            limits: DecodeLimits::default(),
            max_cost: DEFAULT_MAX_COST,
            allowed_types: ConditionTypeSet::all(),
        }
    }
}

impl VerifierConfig {
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_cost(mut self, max_cost: u64) -> Self {
        self.max_cost = max_cost;
        self
    }

    pub fn with_allowed_types(mut self, allowed_types: ConditionTypeSet) -> Self {
        self.allowed_types = allowed_types;
        self
    }
}

/// Verifies fulfillments against conditions under a fixed policy.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    /// Create a verifier with the given configuration.
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Decode a condition under the configured limits.
    pub fn decode_condition(&self, bytes: &[u8]) -> Result<Condition> {
        read_condition_with(bytes, &self.config.limits).map_err(|e| {
            tracing::warn!(error = %e, len = bytes.len(), "rejected condition encoding");
            Error::from(e)
        })
    }

    /// Decode a fulfillment under the configured limits.
    pub fn decode_fulfillment(&self, bytes: &[u8]) -> Result<Fulfillment> {
        read_fulfillment_with(bytes, &self.config.limits).map_err(|e| {
            tracing::warn!(error = %e, len = bytes.len(), "rejected fulfillment encoding");
            Error::from(e)
        })
    }

    /// Check a condition against the cost ceiling and allowed types.
    pub fn check_policy(&self, condition: &Condition) -> Result<()> {
        if condition.cost() > self.config.max_cost {
            tracing::warn!(
                kind = %condition.kind(),
                cost = condition.cost(),
                max_cost = self.config.max_cost,
                "condition cost above ceiling"
            );
            return Err(Error::CostExceeded {
                cost: condition.cost(),
                max: self.config.max_cost,
            });
        }

        if let Some(kind) = self.first_disallowed(condition) {
            tracing::warn!(
                kind = %condition.kind(),
                disallowed = %kind,
                "condition uses a disallowed type"
            );
            return Err(Error::TypeNotAllowed(kind));
        }
        Ok(())
    }

    fn first_disallowed(&self, condition: &Condition) -> Option<ConditionType> {
        let allowed = &self.config.allowed_types;
        if !allowed.contains(condition.kind()) {
            return Some(condition.kind());
        }
        condition.subtypes().iter().find(|t| !allowed.contains(*t))
    }

    /// Verify a fulfillment against a condition and message.
    ///
    /// Policy is checked first; no hashing or signature work is done for a
    /// condition the policy rejects.
    pub fn verify(
        &self,
        fulfillment: &Fulfillment,
        condition: &Condition,
        message: &[u8],
    ) -> Result<bool> {
        self.check_policy(condition)?;

        let valid = fulfillment.verify(condition, message)?;
        tracing::debug!(
            kind = %condition.kind(),
            cost = condition.cost(),
            fingerprint = ?condition.fingerprint(),
            valid,
            "verified fulfillment"
        );
        Ok(valid)
    }

    /// Decode and verify an encoded fulfillment against an encoded condition.
    pub fn verify_encoded(
        &self,
        fulfillment: &[u8],
        condition: &[u8],
        message: &[u8],
    ) -> Result<bool> {
        let condition = self.decode_condition(condition)?;
        self.check_policy(&condition)?;
        let fulfillment = self.decode_fulfillment(fulfillment)?;
        self.verify(&fulfillment, &condition, message)
    }
}
