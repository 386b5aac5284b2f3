mod families;
mod helpers;
mod members;
mod offerings;
mod prayers;
mod query_service;
mod system;
