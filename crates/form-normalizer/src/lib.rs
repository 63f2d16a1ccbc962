use std::collections::BTreeMap;

/// Substrings that mark a field as sensitive. Checked per raw field name,
/// lowercased, before any alias grouping — a denylisted field never
/// reaches the output under any name.
pub const SENSITIVE_SUBSTRINGS: &[&str] = &[
    "password", "pass", "pwd", "credit", "card", "cvv", "ssn", "social",
];

/// One semantic field group: input aliases in priority order, and the
/// canonical output keys that all receive the first matching value.
pub struct AliasGroup {
    pub group: &'static str,
    pub aliases: &'static [&'static str],
    pub outputs: &'static [&'static str],
}

/// The alias rules are data, not code: a single merge routine walks this
/// table. Aliases are matched case-sensitively against raw field names.
pub const ALIAS_TABLE: &[AliasGroup] = &[
    AliasGroup {
        group: "first_name",
        aliases: &["firstName", "first_name", "firstname", "fname"],
        outputs: &["firstName", "first_name"],
    },
    AliasGroup {
        group: "last_name",
        aliases: &["lastName", "last_name", "lastname", "lname"],
        outputs: &["lastName", "last_name"],
    },
    AliasGroup {
        group: "full_name",
        aliases: &["full_name", "fullName", "name", "your_name"],
        outputs: &["full_name", "name"],
    },
    AliasGroup {
        group: "email",
        aliases: &[
            "email",
            "email_id",
            "emailAddress",
            "email_address",
            "lead_email",
            "user_email",
        ],
        outputs: &["email"],
    },
    AliasGroup {
        group: "phone",
        aliases: &[
            "phone",
            "phone_number",
            "phoneNumber",
            "mobile",
            "mobile_no",
            "tel",
            "telephone",
        ],
        outputs: &["phone", "mobile_no"],
    },
    AliasGroup {
        group: "company",
        aliases: &[
            "company",
            "company_name",
            "companyName",
            "organization",
            "organisation",
            "business_name",
        ],
        outputs: &["company"],
    },
    AliasGroup {
        group: "country",
        aliases: &["country", "country_name", "countryName"],
        outputs: &["country"],
    },
    AliasGroup {
        group: "message",
        aliases: &["message", "comments", "comment", "description", "inquiry", "enquiry"],
        outputs: &["message"],
    },
    AliasGroup {
        group: "job_title",
        aliases: &["job_title", "jobTitle", "title", "designation", "role"],
        outputs: &["job_title", "jobTitle"],
    },
    AliasGroup {
        group: "industry",
        aliases: &["industry", "industry_type"],
        outputs: &["industry"],
    },
    AliasGroup {
        group: "website",
        aliases: &["website", "web_site", "company_website"],
        outputs: &["website"],
    },
    AliasGroup {
        group: "region",
        aliases: &["state", "region", "province", "address_region"],
        outputs: &["state", "region"],
    },
    AliasGroup {
        group: "city",
        aliases: &["city", "town", "address_city"],
        outputs: &["city"],
    },
    AliasGroup {
        group: "postal_code",
        aliases: &["postal_code", "postalCode", "zip", "zip_code", "zipcode", "pincode"],
        outputs: &["postal_code", "zip"],
    },
    AliasGroup {
        group: "gender",
        aliases: &["gender", "sex"],
        outputs: &["gender"],
    },
    AliasGroup {
        group: "birth_date",
        aliases: &["birth_date", "birthDate", "date_of_birth", "dob"],
        outputs: &["birth_date", "date_of_birth"],
    },
];

pub fn is_sensitive(field_name: &str) -> bool {
    let lowered = field_name.to_ascii_lowercase();
    SENSITIVE_SUBSTRINGS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Maps raw form fields onto the canonical schema.
///
/// Sensitive fields are dropped first, per field. Surviving unrecognized
/// fields pass through unchanged; for each alias group with at least one
/// non-empty match, every canonical output key receives the first
/// matching value in alias-priority order. Groups absent from the input
/// are absent from the output.
pub fn normalize(raw: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let filtered: BTreeMap<String, String> = raw
        .iter()
        .filter(|(name, _)| !is_sensitive(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    let mut out = filtered.clone();

    // Alias lookups read the filtered input, never earlier group output.
    for group in ALIAS_TABLE {
        let matched = group.aliases.iter().find_map(|alias| {
            filtered
                .get(*alias)
                .filter(|value| !value.trim().is_empty())
                .cloned()
        });
        if let Some(value) = matched {
            for output in group.outputs {
                out.insert((*output).to_owned(), value.clone());
            }
        }
    }

    out
}
