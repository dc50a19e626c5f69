use extld_manifest::LoadingStrategy;

/// The three built-in discovery roots, sorted by declared priority
/// (ascending — lower runs first). Further strategies are themselves
/// discoverable through the same registry mechanism (`extld::bootstrap`
/// wires this self-hosting loop once at director construction); these three
/// are simply its seed set.
pub fn builtin() -> Vec<LoadingStrategy> {
    let mut internal = LoadingStrategy::new("META-INF/dubbo/internal/").priority(0);
    internal.prefer_extension_provider = true;

    let user = LoadingStrategy::new("META-INF/dubbo/").priority(1000);

    let legacy = LoadingStrategy::new("META-INF/services/").priority(2000);

    let mut strategies = vec![internal, user, legacy];
    strategies.sort_by_key(|s| s.priority);
    strategies
}
