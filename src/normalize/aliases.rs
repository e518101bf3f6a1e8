//! Multilingual header alias table (English, Spanish, Greek)

use std::collections::BTreeMap;

use crate::types::CanonicalField;

const DATE_ALIASES: &[&str] = &[
    "date",
    "fecha",
    "data",
    "issue date",
    "posting date",
    "doc date",
    "document date",
    "ημερομηνία",
    "ημ/νία",
];

const DEBIT_ALIASES: &[&str] = &["debit", "debe", "cargo", "dr", "charge", "χρέωση"];

const CREDIT_ALIASES: &[&str] = &[
    "credit", "haber", "abono", "credito", "crédito", "cr", "payment", "pago", "πίστωση",
    "πληρωμή",
];

const AMOUNT_ALIASES: &[&str] = &[
    "amount", "importe", "valor", "total", "value", "sum", "net", "ποσό", "αξία",
];

const DESCRIPTION_ALIASES: &[&str] = &[
    "reason",
    "motivo",
    "concepto",
    "descripcion",
    "descripción",
    "description",
    "detalle",
    "memo",
    "narrative",
    "περιγραφή",
    "αιτιολογία",
];

const INVOICE_ALIASES: &[&str] = &[
    "invoice",
    "inv no",
    "invno",
    "inv#",
    "inv",
    "factura",
    "fact",
    "numero",
    "número",
    "nº",
    "num",
    "document",
    "docno",
    "docnum",
    "doc",
    "refno",
    "ref",
    "reference",
    "voucher",
    "bill",
    "receipt",
    "τιμολόγιο",
    "παραστατικό",
    "αρ",
];

const VENDOR_ALIASES: &[&str] = &["vendor", "supplier", "proveedor", "acreedor", "προμηθευτής"];

const ENTITY_ALIASES: &[&str] = &[
    "entity",
    "company",
    "business unit",
    "bu",
    "cost center",
    "cc",
    "department",
    "dept",
    "organization",
    "org",
    "empresa",
    "sociedad",
    "εταιρεία",
];

/// Aliases this short must match a whole word of the header
const WHOLE_WORD_MAX_CHARS: usize = 3;

/// One lowercase alias and how it is matched against a header
#[derive(Debug, Clone, PartialEq, Eq)]
struct Alias {
    text: String,
    whole_word: bool,
}

impl Alias {
    fn new(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        let whole_word = text.chars().count() <= WHOLE_WORD_MAX_CHARS;
        Self { text, whole_word }
    }

    fn matches(&self, header: &str, words: &[&str]) -> bool {
        if self.text.is_empty() {
            return false;
        }
        if self.whole_word {
            words.iter().any(|w| *w == self.text)
        } else {
            header.contains(&self.text)
        }
    }
}

/// Mapping from canonical field to the lowercase aliases that identify it
///
/// Fields are tried in [`CanonicalField::ALL`] order and the first alias
/// hit wins, so "Invoice date" is a date column and "Debit amount" a debit
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(CanonicalField, Vec<Alias>)>,
}

impl AliasTable {
    /// The built-in English/Spanish/Greek table
    pub fn builtin() -> Self {
        let entries = CanonicalField::ALL
            .iter()
            .map(|field| {
                let aliases = builtin_aliases(*field).iter().map(|a| Alias::new(a)).collect();
                (*field, aliases)
            })
            .collect();
        Self { entries }
    }

    /// The built-in table extended with extra aliases per field
    pub fn with_extra(extra: &BTreeMap<CanonicalField, Vec<String>>) -> Self {
        let mut table = Self::builtin();
        for (field, aliases) in extra {
            if let Some((_, existing)) = table.entries.iter_mut().find(|(f, _)| f == field) {
                for alias in aliases {
                    let alias = Alias::new(alias);
                    if !alias.text.is_empty() && !existing.contains(&alias) {
                        existing.push(alias);
                    }
                }
            }
        }
        table
    }

    /// First field whose alias matches the header
    pub fn field_for(&self, header: &str) -> Option<CanonicalField> {
        let lower = header.trim().to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.entries
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a.matches(&lower, &words)))
            .map(|(field, _)| *field)
    }

}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_aliases(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Date => DATE_ALIASES,
        CanonicalField::Debit => DEBIT_ALIASES,
        CanonicalField::Credit => CREDIT_ALIASES,
        CanonicalField::Amount => AMOUNT_ALIASES,
        CanonicalField::Description => DESCRIPTION_ALIASES,
        CanonicalField::Invoice => INVOICE_ALIASES,
        CanonicalField::Vendor => VENDOR_ALIASES,
        CanonicalField::Entity => ENTITY_ALIASES,
    }
}
