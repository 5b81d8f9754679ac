use super::{check_occur, QueryFactory};
use crate::cypher::{property, CypherQuery, Part};
use crate::predicate::{Condition, Predicate};
use crate::value::Value;

/// Distance search against the well-known `latitude`/`longitude` attributes.
pub struct SpatialQueryFactory;

impl QueryFactory for SpatialQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let Condition::Spatial {
            latitude,
            longitude,
            distance,
        } = &predicate.condition
        else {
            return false;
        };
        if !(latitude.is_finite() && longitude.is_finite() && distance.is_finite()) {
            return false;
        }

        check_occur(query, predicate.occurrence, is_first);

        let lat = query.bind("latitude", Value::Float(*latitude));
        let lon = query.bind("longitude", Value::Float(*longitude));
        let dist = query.bind("distance", Value::Float(*distance));

        query.add_composite(vec![
            Part::Text(format!(
                "point.distance(point({{latitude: {}, longitude: {}}}), point({{latitude: ",
                property("latitude"),
                property("longitude")
            )),
            Part::Param(lat),
            Part::Text(", longitude: ".to_string()),
            Part::Param(lon),
            Part::Text("})) <= ".to_string()),
            Part::Param(dist),
        ]);
        true
    }
}
