#[cfg(test)]
mod common;

#[cfg(test)]
mod auth_tests;

#[cfg(test)]
mod account_tests;


#[cfg(test)]
mod export_preview_tests;

#[cfg(test)]
mod export_csv_tests;





#[cfg(test)]
mod client_tests;

#[cfg(test)]
mod session_tests;

#[cfg(test)]
mod message_tests;

#[cfg(test)]
mod health_tests;
