//! The fixed acquisition query.

/// Property-use-type codes admitted by the acquisition query.
pub const QUERY_LAND_USE_CODES: &[i64] = &[261, 262, 263, 264, 268, 273, 274, 276, 279];

/// Every property with coordinates and an admitted use-type code, inner-joined
/// with its latest transaction per (parcel, log-error) group and left-joined
/// with the seven descriptive lookup tables.
pub const ZILLOW_QUERY: &str = "\
SELECT prop.*,
       pred.logerror,
       pred.transactiondate,
       air.airconditioningdesc,
       arch.architecturalstyledesc,
       build.buildingclassdesc,
       heat.heatingorsystemdesc,
       landuse.propertylandusedesc,
       story.storydesc,
       construct.typeconstructiondesc
FROM   properties_2017 AS prop
       INNER JOIN (SELECT parcelid,
                          logerror,
                          MAX(transactiondate) AS transactiondate
                   FROM   predictions_2017
                   GROUP  BY parcelid, logerror) AS pred
               USING (parcelid)
       LEFT JOIN airconditioningtype AS air USING (airconditioningtypeid)
       LEFT JOIN architecturalstyletype AS arch USING (architecturalstyletypeid)
       LEFT JOIN buildingclasstype AS build USING (buildingclasstypeid)
       LEFT JOIN heatingorsystemtype AS heat USING (heatingorsystemtypeid)
       LEFT JOIN propertylandusetype AS landuse USING (propertylandusetypeid)
       LEFT JOIN storytype AS story USING (storytypeid)
       LEFT JOIN typeconstructiontype AS construct USING (typeconstructiontypeid)
WHERE  prop.latitude IS NOT NULL
       AND prop.longitude IS NOT NULL
       AND prop.propertylandusetypeid IN (261, 262, 263, 264, 268, 273, 274, 276, 279)";
