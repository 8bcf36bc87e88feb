//! Server-rendered HTML dashboard.

use std::fmt;

use axum::{response::Html, Extension};
use common::{Date, Money};
use service::{
    query::ledger::{self, Ledger},
    read::{aging, rent_roll},
    Query as _,
};

use crate::{Error, Service};

use super::storage_error;

/// Renders the [`Dashboard`] of the current month.
///
/// The rent roll and the aging are read from the same [`Ledger`] snapshot.
///
/// # Errors
///
/// If the storage fails.
pub async fn dashboard(
    Extension(service): Extension<Service>,
) -> Result<Html<String>, Error> {
    let as_of = service.today();
    let ledger::Output { rent_roll, aging } = service
        .execute(Ledger { as_of })
        .await
        .map_err(storage_error)?;

    Ok(Html(
        Dashboard {
            as_of,
            rent_roll: &rent_roll,
            aging: &aging,
        }
        .to_string(),
    ))
}

/// HTML page with the month totals, the rent roll and the aging tables.
#[derive(Clone, Copy, Debug)]
pub struct Dashboard<'a> {
    /// [`Date`] the page is rendered as of.
    pub as_of: Date,

    /// Rent roll of the month.
    pub rent_roll: &'a [rent_roll::Row],

    /// Aging of every lease.
    pub aging: &'a [aging::Row],
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            as_of,
            rent_roll,
            aging,
        } = self;

        let charges: Money =
            rent_roll.iter().map(|r| r.monthly_charges).sum();
        let payments: Money =
            rent_roll.iter().map(|r| r.monthly_payments).sum();
        let balance: Money =
            rent_roll.iter().map(|r| r.month_balance).sum();
        let aged: Money = aging.iter().map(|r| r.total_due).sum();
        let overdue =
            aging.iter().filter(|r| r.total_due.is_positive()).count();

        write!(
            f,
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>LeaseLedger</title>\n\
             <style>\n\
             body {{ font-family: sans-serif; margin: 2rem; }}\n\
             table {{ border-collapse: collapse; margin-bottom: 2rem; }}\n\
             th, td {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; }}\n\
             td.num {{ text-align: right; }}\n\
             </style>\n\
             </head>\n\
             <body>\n\
             <h1>LeaseLedger</h1>\n\
             <p>As of {as_of}</p>\n\
             <dl>\n\
             <dt>Charges this month</dt><dd>${charges}</dd>\n\
             <dt>Payments this month</dt><dd>${payments}</dd>\n\
             <dt>Balance this month</dt><dd>${balance}</dd>\n\
             <dt>Total aged balance</dt><dd>${aged}</dd>\n\
             <dt>Overdue leases</dt><dd>{overdue}</dd>\n\
             </dl>\n",
        )?;

        f.write_str(
            "<h2>Rent roll</h2>\n\
             <table>\n\
             <tr><th>Lease</th><th>Tenant</th><th>Unit</th>\
             <th>Charges</th><th>Payments</th><th>Balance</th></tr>\n",
        )?;
        for row in *rent_roll {
            writeln!(
                f,
                "<tr><td>{}</td><td>{}</td><td>{}</td>\
                 <td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td></tr>",
                row.lease_id,
                Escaped(row.tenant_name.as_ref()),
                Escaped(row.unit_no.as_ref()),
                row.monthly_charges,
                row.monthly_payments,
                row.month_balance,
            )?;
        }
        f.write_str("</table>\n")?;

        f.write_str(
            "<h2>Accounts receivable aging</h2>\n\
             <table>\n\
             <tr><th>Lease</th><th>Tenant</th><th>Unit</th>\
             <th>0-30</th><th>31-60</th><th>61-90</th><th>90+</th>\
             <th>Total due</th></tr>\n",
        )?;
        for row in *aging {
            writeln!(
                f,
                "<tr><td>{}</td><td>{}</td><td>{}</td>\
                 <td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td></tr>",
                row.lease_id,
                Escaped(row.tenant_name.as_ref()),
                Escaped(row.unit_no.as_ref()),
                row.bucket_0_30,
                row.bucket_31_60,
                row.bucket_61_90,
                row.bucket_90_plus,
                row.total_due,
            )?;
        }
        f.write_str("</table>\n</body>\n</html>\n")
    }
}

/// Text escaped to be safely embedded into HTML.
#[derive(Clone, Copy, Debug)]
struct Escaped<'s>(&'s str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
            let (plain, special) = rest.split_at(pos);
            f.write_str(plain)?;
            f.write_str(match special.as_bytes()[0] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            })?;
            rest = &special[1..];
        }
        f.write_str(rest)
    }
}
