//! [`Ledger`] definition.

use common::{
    operations::{By, Commit, Select, Transact, Transacted},
    Date,
};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    read::{aging, rent_roll},
    Query, Service,
};

/// [`Query`] of both the rent roll and the aging as of the same [`Date`].
///
/// Both are read from the same snapshot of the [`Database`], so their totals
/// always agree with each other.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ledger {
    /// [`Date`] to read the [`Ledger`] as of.
    pub as_of: Date,
}

/// Output of the [`Ledger`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// Rent roll of the month of the [`Ledger::as_of`] date.
    pub rent_roll: Vec<rent_roll::Row>,

    /// Aging of every lease.
    pub aging: Vec<aging::Row>,
}

impl<Db> Query<Ledger> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<rent_roll::Row>, Date>>,
            Ok = Vec<rent_roll::Row>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<aging::Row>, Date>>,
            Ok = Vec<aging::Row>,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Ledger { as_of }: Ledger,
    ) -> Result<Self::Ok, Self::Err> {
        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        let rent_roll = tx
            .execute(Select(By::<Vec<rent_roll::Row>, _>::new(as_of)))
            .await
            .map_err(tracerr::wrap!())?;
        let aging = tx
            .execute(Select(By::<Vec<aging::Row>, _>::new(as_of)))
            .await
            .map_err(tracerr::wrap!())?;

        tx.execute(Commit).await.map_err(tracerr::wrap!())?;

        Ok(Output { rent_roll, aging })
    }
}
