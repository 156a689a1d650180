//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cryptoconditions_core::{
    Condition, ConditionType, Ed25519Fulfillment, Fulfillment, Keypair, PrefixFulfillment,
    PreimageFulfillment, ThresholdFulfillment,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate bytes of specified max length.
pub fn bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a ConditionType.
pub fn condition_type() -> impl Strategy<Value = ConditionType> {
    prop_oneof![
        Just(ConditionType::PreimageSha256),
        Just(ConditionType::PrefixSha256),
        Just(ConditionType::ThresholdSha256),
        Just(ConditionType::RsaSha256),
        Just(ConditionType::Ed25519Sha256),
    ]
}

/// Generate a preimage fulfillment.
pub fn preimage_fulfillment() -> impl Strategy<Value = Fulfillment> {
    bytes(64).prop_map(|preimage| PreimageFulfillment::new(preimage).into())
}

/// Generate an Ed25519 fulfillment signing a random message.
pub fn ed25519_fulfillment() -> impl Strategy<Value = Fulfillment> {
    (keypair(), bytes(64))
        .prop_map(|(keypair, message)| Ed25519Fulfillment::sign(&keypair, &message).into())
}

/// Generate a non-compound fulfillment.
pub fn leaf_fulfillment() -> impl Strategy<Value = Fulfillment> {
    prop_oneof![preimage_fulfillment(), ed25519_fulfillment()]
}

/// Generate a bare non-compound condition.
pub fn leaf_condition() -> impl Strategy<Value = Condition> {
    leaf_fulfillment().prop_map(|f| f.condition().clone())
}

/// Generate a fulfillment tree of prefix and threshold nodes over leaves.
pub fn fulfillment() -> impl Strategy<Value = Fulfillment> {
    leaf_fulfillment().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (bytes(16), 0u64..=1024, inner.clone()).prop_map(|(prefix, max_len, sub)| {
                PrefixFulfillment::new(prefix, max_len, sub)
                    .expect("cost fits")
                    .into()
            }),
            (
                prop::collection::vec(inner, 1..4),
                prop::collection::vec(leaf_condition(), 0..3),
            )
                .prop_map(|(subfulfillments, subconditions)| {
                    let threshold = subfulfillments.len();
                    ThresholdFulfillment::new(threshold, subfulfillments, subconditions)
                        .expect("threshold matches subfulfillments")
                        .into()
                }),
        ]
    })
}

/// Parameters for building a threshold fulfillment.
#[derive(Debug, Clone)]
pub struct ThresholdParams {
    pub threshold: usize,
    pub subfulfillments: Vec<Fulfillment>,
    pub subconditions: Vec<Condition>,
}

impl Arbitrary for ThresholdParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(leaf_fulfillment(), 1..5),
            prop::collection::vec(leaf_condition(), 0..4),
        )
            .prop_map(|(subfulfillments, subconditions)| ThresholdParams {
                threshold: subfulfillments.len(),
                subfulfillments,
                subconditions,
            })
            .boxed()
    }
}

impl ThresholdParams {
    /// Build the fulfillment from these parameters.
    pub fn build(&self) -> ThresholdFulfillment {
        ThresholdFulfillment::new(
            self.threshold,
            self.subfulfillments.clone(),
            self.subconditions.clone(),
        )
        .expect("threshold matches subfulfillments")
    }

    /// The same branches in reverse order.
    pub fn reversed(&self) -> Self {
        let mut subfulfillments = self.subfulfillments.clone();
        let mut subconditions = self.subconditions.clone();
        subfulfillments.reverse();
        subconditions.reverse();
        Self {
            threshold: self.threshold,
            subfulfillments,
            subconditions,
        }
    }
}
