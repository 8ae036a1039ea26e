/*
    http -> DTO dei body JSON accettati dalle rotte /user
*/
pub mod http;
