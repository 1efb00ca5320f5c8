use proc_macro::TokenStream;

mod injectable;

/// Derive macro for the `Injectable` trait
///
/// Every field must be an `Arc`. `Arc<T>` fields are resolved with
/// `Container::resolve::<T>()`, `Arc<dyn Trait>` fields with
/// `Container::resolve_trait::<dyn Trait>()`. Unit structs inject trivially.
///
/// # Example
/// ```ignore
/// use roster::Injectable;
///
/// #[derive(Injectable)]
/// pub struct UserService {
///     repository: Arc<dyn Repository<User>>,
/// }
/// ```
#[proc_macro_derive(Injectable)]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}
