pub const INSERT_GPS_POINT: &str = r#"
INSERT INTO gps_points (id, gps_device_id, vehicle_id, captured_at, lat, lon, speed_kmh, heading_deg, raw_payload)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9);
"#;

pub const SELECT_LATEST_POINTS: &str = r#"
SELECT DISTINCT ON (vehicle_id)
    id, gps_device_id, vehicle_id, captured_at, lat, lon, speed_kmh, heading_deg, raw_payload, created_at
FROM gps_points
WHERE vehicle_id = ANY($1) AND captured_at >= $2
ORDER BY vehicle_id, captured_at DESC;
"#;

pub const SELECT_TRACK: &str = r#"
SELECT id, gps_device_id, vehicle_id, captured_at, lat, lon, speed_kmh, heading_deg, raw_payload, created_at
FROM gps_points
WHERE vehicle_id = $1 AND captured_at >= $2 AND captured_at <= $3
ORDER BY captured_at ASC;
"#;

pub const DELETE_POINTS_OLDER_THAN: &str = r#"
DELETE FROM gps_points WHERE captured_at < $1;
"#;

pub const SELECT_VEHICLE_BY_ID: &str = r#"
SELECT id, plate_number, contractor_id, is_active, created_at, updated_at
FROM vehicles
WHERE id = $1;
"#;

pub const SELECT_VEHICLE_BY_PLATE: &str = r#"
SELECT id, plate_number, contractor_id, is_active, created_at, updated_at
FROM vehicles
WHERE plate_number = $1;
"#;

pub const SELECT_VEHICLES: &str = r#"
SELECT id, plate_number, contractor_id, is_active, created_at, updated_at
FROM vehicles
ORDER BY plate_number ASC;
"#;

pub const SELECT_VEHICLES_BY_CONTRACTOR: &str = r#"
SELECT id, plate_number, contractor_id, is_active, created_at, updated_at
FROM vehicles
WHERE contractor_id = $1
ORDER BY plate_number ASC;
"#;

pub const INSERT_VEHICLE: &str = r#"
INSERT INTO vehicles (id, plate_number, is_active)
VALUES ($1, $2, $3);
"#;

pub const SELECT_ACTIVE_POLYGONS: &str = r#"
SELECT id, name FROM polygons WHERE is_active = TRUE ORDER BY created_at ASC;
"#;

// Geometry stays in PostGIS; containment is delegated wholesale.
pub const POLYGON_CONTAINS_POINT: &str = r#"
SELECT ST_Contains(
    (SELECT geometry FROM polygons WHERE id = $1),
    ST_SetSRID(ST_MakePoint($2, $3), 4326)
);
"#;

pub const SELECT_CAMERAS_BY_POLYGON: &str = r#"
SELECT id, type::text AS kind, is_active
FROM cameras
WHERE polygon_id = $1
ORDER BY created_at ASC;
"#;
