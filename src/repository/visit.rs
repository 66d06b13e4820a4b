use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::visit::{CountryVisits, NewVisit as DomainNewVisit, VisitStats};
use crate::models::visit::NewVisit;
use crate::repository::{DieselRepository, RepositoryResult, VisitReader, VisitRecorder};

impl VisitRecorder for DieselRepository {
    fn record_visit(&self, visit: &DomainNewVisit) -> RepositoryResult<()> {
        use crate::schema::{products, visit_stats};

        let mut conn = self.conn()?;

        // Counts every view; unknown ids update nothing.
        diesel::update(products::table.filter(products::id.eq(visit.product_id.as_str())))
            .set(products::total_clicks.eq(products::total_clicks + 1))
            .execute(&mut conn)?;

        let inserted = diesel::insert_into(visit_stats::table)
            .values(NewVisit::from(visit))
            .execute(&mut conn);

        match inserted {
            Ok(_) => Ok(()),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                log::debug!(
                    "Repeat visit from {} to product {} not stored",
                    visit.ip_address,
                    visit.product_id
                );
                Ok(())
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                log::debug!("Visit to unknown product {} not stored", visit.product_id);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl VisitReader for DieselRepository {
    fn get_visit_stats(&self, product_id: &str) -> RepositoryResult<VisitStats> {
        use crate::schema::{products, visit_stats};

        let mut conn = self.conn()?;

        let total_clicks = products::table
            .filter(products::id.eq(product_id))
            .select(products::total_clicks)
            .first::<i32>(&mut conn)
            .optional()?
            .unwrap_or(0);

        let unique_visitors = visit_stats::table
            .filter(visit_stats::product_id.eq(product_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        let mut countries: Vec<CountryVisits> = visit_stats::table
            .filter(visit_stats::product_id.eq(product_id))
            .group_by(visit_stats::country)
            .select((visit_stats::country, count_star()))
            .load::<(String, i64)>(&mut conn)?
            .into_iter()
            .map(|(country, count)| CountryVisits { country, count })
            .collect();
        countries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));

        Ok(VisitStats {
            total_clicks: i64::from(total_clicks),
            unique_visitors,
            countries,
        })
    }
}
