/// The outcome of a closest-feature test on a pair of bodies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeatureStatus {
    /// The closest features were found, but the bodies are not colliding.
    FoundFeatures,
    /// The bodies touch and approach each other; a collision response is needed.
    AddedResponse,
    /// The bodies overlap too deeply for their closest features to be tracked.
    Penetration,
}
