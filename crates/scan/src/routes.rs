//! Internal navigation targets.

pub const CARD_DONATION: &str = "/settings/cards/donation";
pub const CARD_SETTINGS: &str = "/settings/cards";
pub const TRANSFER_INVOICE: &str = "/transfer/invoice";
pub const TRANSFER_LNURL: &str = "/transfer/lnurl";

pub fn card_donation(event_param: &str) -> String {
    format!("{}?event={}", CARD_DONATION, event_param)
}

pub fn card_settings(card_id: &str) -> String {
    format!("{}?c={}", CARD_SETTINGS, card_id)
}

pub fn transfer_invoice(invoice: &str) -> String {
    format!("{}/{}", TRANSFER_INVOICE, invoice.to_lowercase())
}

pub fn transfer_lnurl(data: &str) -> String {
    format!("{}?data={}", TRANSFER_LNURL, data.to_lowercase())
}
