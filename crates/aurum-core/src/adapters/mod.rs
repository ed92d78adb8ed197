mod metalprice;
mod telegram;

pub use metalprice::{MetalPriceAdapter, DEFAULT_BASE_URL};
pub use telegram::TelegramNotifier;
