pub mod coordinates;
pub mod vector3d;
