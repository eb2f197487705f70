use proc_macro::TokenStream;

mod activatable;
mod activation_module;

/// Attribute macro exporting the activation methods of an `impl` block
///
/// Every associated function without a receiver, arguments or generics that
/// returns `()` or a `Result` becomes callable by name through a
/// `TypeRegistry`. The type registers under its own name unless `name` is given.
///
/// # Example
/// ```rust,ignore
/// use activator::activatable;
///
/// pub struct Database;
///
/// #[activatable]
/// impl Database {
///     fn connect() -> anyhow::Result<()> {
///         Ok(())
///     }
///
///     fn disconnect() {}
/// }
///
/// pub struct Legacy;
///
/// #[activatable(name = "Company.Legacy")]
/// impl Legacy {
///     pub fn boot() {}
/// }
/// ```
#[proc_macro_attribute]
pub fn activatable(attr: TokenStream, item: TokenStream) -> TokenStream {
    activatable::activatable_attribute(attr, item)
}

/// Attribute macro declaring the activation markers of a module
///
/// # Example
/// ```rust,ignore
/// use activator::{activatable, activation_module};
///
/// pub struct Database;
///
/// #[activatable]
/// impl Database {
///     fn connect() {}
///     fn disconnect() {}
/// }
///
/// #[activation_module(
///     name = "storage",
///     file = "Storage.dll",
///     startup = [Database::connect(order = 1)],
///     exit = [Database::disconnect],
/// )]
/// pub struct StorageModule;
/// ```
#[proc_macro_attribute]
pub fn activation_module(attr: TokenStream, item: TokenStream) -> TokenStream {
    activation_module::activation_module_attribute(attr, item)
}
