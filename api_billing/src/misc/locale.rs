use i18n::Locale;
use stripe::CheckoutSessionLocale;

/// Stripe Checkout page language for a site locale.
pub(crate) fn checkout_locale(locale: Locale) -> CheckoutSessionLocale {
    match locale {
        Locale::En => CheckoutSessionLocale::En,
        Locale::Es => CheckoutSessionLocale::Es,
        Locale::Fr => CheckoutSessionLocale::Fr,
        Locale::De => CheckoutSessionLocale::De,
    }
}
